//! Instruction and source models consumed by the aligner
//!
//! Both types deserialize straight from a disassembly dump. Field aliases
//! accept the names most bytecode disassemblers print (`opname`, `arg`,
//! `argrepr`, `starts_line`).

use super::widths::{expand_tabs, TAB_SIZE};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref RE_JUMP: Regex = Regex::new(r"^to (\d+)").unwrap();
}

/// One decoded instruction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instruction {
    pub offset: usize,
    #[serde(alias = "opname")]
    pub mnemonic: String,
    #[serde(default, alias = "arg")]
    pub operand: Option<i64>,
    #[serde(default, alias = "argrepr")]
    pub operand_text: String,
    #[serde(default)]
    pub is_jump_target: bool,
    /// 1-based absolute source line; `None` continues the previous line
    #[serde(default, alias = "starts_line")]
    pub source_line: Option<usize>,
}

impl Instruction {
    pub fn new(offset: usize, mnemonic: impl Into<String>) -> Self {
        Instruction {
            offset,
            mnemonic: mnemonic.into(),
            operand: None,
            operand_text: String::new(),
            is_jump_target: false,
            source_line: None,
        }
    }

    pub fn with_operand(mut self, operand: i64, text: impl Into<String>) -> Self {
        self.operand = Some(operand);
        self.operand_text = text.into();
        self
    }

    pub fn on_line(mut self, line: usize) -> Self {
        self.source_line = Some(line);
        self
    }

    pub fn jump_target(mut self) -> Self {
        self.is_jump_target = true;
        self
    }

    /// Offset named by a `to <offset>` operand text, if any
    pub fn jump_destination(&self) -> Option<usize> {
        RE_JUMP
            .captures(&self.operand_text)
            .and_then(|caps| caps[1].parse().ok())
    }

    /// The operand read as an offset, for operands that are plain jump offsets
    pub fn operand_offset(&self) -> Option<usize> {
        self.operand.and_then(|arg| usize::try_from(arg).ok())
    }
}

#[derive(Deserialize)]
struct RawSourceText {
    start_line: usize,
    lines: Vec<String>,
}

impl From<RawSourceText> for SourceText {
    fn from(raw: RawSourceText) -> Self {
        SourceText::new(raw.start_line, raw.lines)
    }
}

/// Raw source lines of one function plus the number of its first line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSourceText")]
pub struct SourceText {
    pub start_line: usize,
    pub lines: Vec<String>,
}

impl SourceText {
    /// Build from raw lines, stripping trailing whitespace and newlines
    ///
    /// Tabs are expanded to [`TAB_SIZE`] columns and other control characters
    /// dropped, so every line measures the same as it prints.
    pub fn new<I, S>(start_line: usize, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SourceText {
            start_line,
            lines: lines
                .into_iter()
                .map(|line| expand_tabs(line.as_ref().trim_end(), TAB_SIZE))
                .collect(),
        }
    }

    /// Absolute number of the last line; `start_line - 1` when empty
    pub fn last_line(&self) -> usize {
        self.end_line().saturating_sub(1)
    }

    /// One past the last line
    pub fn end_line(&self) -> usize {
        self.start_line + self.lines.len()
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start_line && line < self.end_line()
    }

    /// Text of an absolute line number
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(self.start_line)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_destination() {
        let jump = Instruction::new(4, "POP_JUMP_IF_FALSE").with_operand(12, "to 12");
        assert_eq!(jump.jump_destination(), Some(12));

        let load = Instruction::new(0, "LOAD_FAST").with_operand(0, "x");
        assert_eq!(load.jump_destination(), None);

        // only a leading "to" counts
        let other = Instruction::new(0, "LOAD_CONST").with_operand(1, "'go to 3'");
        assert_eq!(other.jump_destination(), None);
    }

    #[test]
    fn test_source_text_strips_trailing_whitespace() {
        let source = SourceText::new(10, ["def f():   \n", "    pass\t"]);
        assert_eq!(source.lines, vec!["def f():", "    pass"]);
        assert_eq!(source.last_line(), 11);
        assert_eq!(source.line(11), Some("    pass"));
        assert_eq!(source.line(9), None);
        assert!(source.contains(10));
        assert!(!source.contains(12));
    }

    #[test]
    fn test_source_text_expands_tabs() {
        let source = SourceText::new(1, ["func f() {", "\treturn\t1\r", "}"]);
        assert_eq!(source.lines, vec!["func f() {", "    return  1", "}"]);
    }

    #[test]
    fn test_deserialize_disassembler_field_names() {
        let json = r#"{"offset": 2, "opname": "JUMP_FORWARD", "arg": 4,
                       "argrepr": "to 8", "starts_line": null}"#;
        let instr: Instruction = serde_json::from_str(json).unwrap();

        assert_eq!(instr.mnemonic, "JUMP_FORWARD");
        assert_eq!(instr.operand, Some(4));
        assert_eq!(instr.jump_destination(), Some(8));
        assert!(!instr.is_jump_target);
        assert_eq!(instr.source_line, None);
    }

    #[test]
    fn test_deserialize_source_text() {
        let json = r#"{"start_line": 3, "lines": ["def f():  ", "    return 1\n"]}"#;
        let source: SourceText = serde_json::from_str(json).unwrap();
        assert_eq!(source, SourceText::new(3, ["def f():", "    return 1"]));
    }
}
