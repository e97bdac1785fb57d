//! Groups `Tj` strings drawn between `BT` and `ET` into text blocks.

use crate::error::Result;
use crate::operation::{BEGIN_TEXT, END_TEXT, Operation, SHOW_TEXT};

/// Drawn strings of one `BT` .. `ET` run, in drawing order.
pub type TextBlock = Vec<String>;

/// Two-state machine: outside a block, or collecting one.
#[derive(Debug, Default)]
pub struct BlockSegmenter {
    open: Option<TextBlock>,
}

impl BlockSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one operation; returns the finished block when `op` closes one.
    pub fn push(&mut self, op: &Operation) -> Option<TextBlock> {
        let Some(block) = self.open.as_mut() else {
            if op.is_marker(BEGIN_TEXT) {
                self.open = Some(Vec::new());
            }
            return None;
        };

        if op.is_marker(END_TEXT) {
            return self.open.take();
        }
        if op.operator == SHOW_TEXT {
            // A non-text operand still occupies a slot so later offsets line up.
            if let Some(first) = op.operands.first() {
                block.push(first.as_text().unwrap_or_default().to_string());
            }
        }
        None
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Iterator adapter yielding finished blocks. An unterminated block at the end
/// of the stream is dropped.
pub struct TextBlocks<I> {
    ops: I,
    segmenter: BlockSegmenter,
}

pub fn text_blocks<I>(ops: I) -> TextBlocks<I::IntoIter>
where
    I: IntoIterator<Item = Result<Operation>>,
{
    TextBlocks {
        ops: ops.into_iter(),
        segmenter: BlockSegmenter::new(),
    }
}

impl<I> Iterator for TextBlocks<I>
where
    I: Iterator<Item = Result<Operation>>,
{
    type Item = Result<TextBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        for op in self.ops.by_ref() {
            match op {
                Ok(op) => {
                    if let Some(block) = self.segmenter.push(&op) {
                        return Some(Ok(block));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
        if self.segmenter.is_open() {
            log::debug!("stream ends inside a text block; dropping it");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operand;

    fn blocks(ops: Vec<Operation>) -> Vec<TextBlock> {
        text_blocks(ops.into_iter().map(Ok))
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_collects_text_between_markers() {
        let ops = vec![
            Operation::show_text("outside"),
            Operation::begin_text(),
            Operation::new("Tf", vec![Operand::Name("F1".into()), Operand::Number(9.0)]),
            Operation::show_text("a"),
            Operation::show_text("b"),
            Operation::end_text(),
            Operation::begin_text(),
            Operation::show_text("c"),
            Operation::end_text(),
        ];
        assert_eq!(blocks(ops), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let ops = vec![
            Operation::begin_text(),
            Operation::show_text("kept"),
            Operation::end_text(),
            Operation::begin_text(),
            Operation::show_text("lost"),
        ];
        let mut segmenter = BlockSegmenter::new();
        for op in &ops {
            segmenter.push(op);
        }
        assert!(segmenter.is_open());
        assert_eq!(blocks(ops), vec![vec!["kept"]]);
    }

    #[test]
    fn test_open_block_at_stream_end_yields_nothing() {
        let ops = vec![
            Operation::begin_text(),
            Operation::show_text("01.02.23"),
            Operation::show_text(""),
        ];
        let mut iter = text_blocks(ops.into_iter().map(Ok));
        assert!(iter.next().is_none());
        assert!(iter.segmenter.is_open());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_markers_with_operands_are_ignored() {
        let ops = vec![
            Operation::new("BT", vec![Operand::Other]),
            Operation::show_text("x"),
            Operation::begin_text(),
            Operation::new("ET", vec![Operand::Other]),
            Operation::show_text("y"),
            Operation::end_text(),
        ];
        assert_eq!(blocks(ops), vec![vec!["y"]]);
    }

    #[test]
    fn test_non_text_operand_keeps_its_slot() {
        let ops = vec![
            Operation::begin_text(),
            Operation::show_text("a"),
            Operation::new("Tj", vec![Operand::Number(3.0)]),
            Operation::new("Tj", vec![]),
            Operation::show_text("b"),
            Operation::end_text(),
        ];
        assert_eq!(blocks(ops), vec![vec!["a", "", "b"]]);
    }

    #[test]
    fn test_nested_begin_does_not_reset_block() {
        let ops = vec![
            Operation::begin_text(),
            Operation::show_text("a"),
            Operation::begin_text(),
            Operation::show_text("b"),
            Operation::end_text(),
        ];
        assert_eq!(blocks(ops), vec![vec!["a", "b"]]);
    }
}
