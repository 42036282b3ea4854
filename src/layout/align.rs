//! Source/instruction alignment
//!
//! Merges the source lines of a function with its instruction stream into
//! three parallel columns of equal length: source text, instruction row and
//! line-number label.
//!
//! # Row rules
//!
//! - Source lines before the first instruction's line become *leading rows*
//!   with blank instruction cells. Only the first one carries a number.
//! - When an instruction starts a new line, every line skipped since the last
//!   one (blank lines, comments, continuation lines) gets its own row.
//! - All instructions of one line get one row each. The source text sits on
//!   the row of the *last* of them; the earlier ones get a blank source cell.
//! - An instruction that goes back to an earlier line (the jump closing a
//!   loop, say) ends the open line. It and the unnumbered instructions after
//!   it get blank source cells until a later line starts.
//! - Lines after the last instruction's line become *trailing rows*.
//! - Blank lines never show a number.

use super::errors::LayoutError;
use super::instruction::{Instruction, SourceText};
use super::jumps::JumpColorMap;
use log::trace;
use ratatui::style::Color;

/// Placeholder shown when a function has no retrievable source
pub const NO_SOURCE_SENTINEL: &str = "NO SOURCE CODE FOUND";

/// One text cell of the instruction grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub text: String,
    pub color: Option<Color>,
}

impl Cell {
    fn new(text: impl Into<String>, color: Option<Color>) -> Self {
        Cell {
            text: text.into(),
            color,
        }
    }
}

/// The four grid cells of one instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionCells {
    pub offset: Cell,
    pub mnemonic: Cell,
    pub operand: Cell,
    pub operand_text: Cell,
}

/// One row of the instruction pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionRow {
    Blank,
    Instruction(InstructionCells),
}

impl InstructionRow {
    /// Render an instruction into cells, coloring offsets that belong to jumps
    pub fn from_instruction(instr: &Instruction, jump_colors: &JumpColorMap) -> Self {
        let offset_color = jump_colors.get(&instr.offset).copied();
        let operand_color = instr
            .operand_offset()
            .and_then(|arg| jump_colors.get(&arg).copied());
        let text_color = instr
            .jump_destination()
            .and_then(|dest| jump_colors.get(&dest).copied());

        InstructionRow::Instruction(InstructionCells {
            offset: Cell::new(instr.offset.to_string(), offset_color),
            mnemonic: Cell::new(instr.mnemonic.clone(), None),
            operand: Cell::new(
                instr.operand.map(|arg| arg.to_string()).unwrap_or_default(),
                text_color.or(operand_color),
            ),
            operand_text: Cell::new(instr.operand_text.clone(), text_color),
        })
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, InstructionRow::Blank)
    }

    pub fn cells(&self) -> Option<&InstructionCells> {
        match self {
            InstructionRow::Blank => None,
            InstructionRow::Instruction(cells) => Some(cells),
        }
    }
}

/// Three parallel columns of equal length
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignedRows {
    pub source: Vec<String>,
    pub instructions: Vec<InstructionRow>,
    pub numbers: Vec<String>,
}

impl AlignedRows {
    fn with_capacity(capacity: usize) -> Self {
        AlignedRows {
            source: Vec::with_capacity(capacity),
            instructions: Vec::with_capacity(capacity),
            numbers: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, source: String, row: InstructionRow, number: String) {
        self.source.push(source);
        self.instructions.push(row);
        self.numbers.push(number);
    }

    /// Push an absolute source line, labelled unless it is blank
    fn push_line(&mut self, source: &SourceText, line: usize, row: InstructionRow) {
        let text = source.line(line).unwrap_or_default().to_string();
        let number = line_label(&text, line);
        self.push(text, row, number);
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Width of the widest number label, at least 1
    pub fn number_width(&self) -> usize {
        self.numbers
            .iter()
            .map(|n| n.chars().count())
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Iterate rows as `(source, instruction, number)` triples
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstructionRow, &str)> {
        self.source
            .iter()
            .zip(&self.instructions)
            .zip(&self.numbers)
            .map(|((s, i), n)| (s.as_str(), i, n.as_str()))
    }
}

fn line_label(text: &str, line: usize) -> String {
    if text.trim().is_empty() {
        String::new()
    } else {
        line.to_string()
    }
}

fn check_offsets(instructions: &[Instruction]) -> Result<(), LayoutError> {
    for pair in instructions.windows(2) {
        if pair[1].offset <= pair[0].offset {
            return Err(LayoutError::UnsortedInstructions {
                offset: pair[1].offset,
                previous: pair[0].offset,
            });
        }
    }
    Ok(())
}

fn check_lines(instructions: &[Instruction], source: &SourceText) -> Result<(), LayoutError> {
    for instr in instructions {
        if let Some(line) = instr.source_line {
            if !source.contains(line) {
                return Err(LayoutError::LineOutOfRange {
                    offset: instr.offset,
                    line,
                    first: source.start_line,
                    last: source.last_line(),
                });
            }
        }
    }
    Ok(())
}

/// Align instructions with their source
///
/// `source` is `None` when the function's source could not be retrieved; the
/// result then starts with a single [`NO_SOURCE_SENTINEL`] row followed by one
/// row per instruction.
pub fn align(
    instructions: &[Instruction],
    source: Option<&SourceText>,
    jump_colors: &JumpColorMap,
) -> Result<AlignedRows, LayoutError> {
    check_offsets(instructions)?;

    let Some(source) = source else {
        return Ok(align_without_source(instructions, jump_colors));
    };
    check_lines(instructions, source)?;

    let mut rows = AlignedRows::with_capacity(source.lines.len() + instructions.len());

    let first = instructions
        .first()
        .map(|instr| instr.source_line.unwrap_or(source.start_line))
        .unwrap_or(source.end_line());

    // Leading rows
    for (idx, line) in (source.start_line..first).enumerate() {
        let text = source.line(line).unwrap_or_default().to_string();
        let number = if idx == 0 {
            line_label(&text, line)
        } else {
            String::new()
        };
        rows.push(text, InstructionRow::Blank, number);
    }

    // Instructions of the line currently being collected
    let mut pending: Vec<InstructionRow> = Vec::new();
    let mut current: Option<usize> = None;
    let mut next_line = first;

    for (idx, instr) in instructions.iter().enumerate() {
        let row = InstructionRow::from_instruction(instr, jump_colors);
        let starts = match instr.source_line {
            Some(line) if line >= next_line => Some(line),
            None if idx == 0 => Some(first),
            _ => None,
        };

        if let Some(line) = starts {
            flush_line(&mut rows, source, current.take(), &mut pending);
            for skipped in next_line..line {
                rows.push_line(source, skipped, InstructionRow::Blank);
            }
            current = Some(line);
            next_line = line + 1;
            pending.push(row);
            continue;
        }

        let same_line = match instr.source_line {
            Some(line) => current == Some(line),
            None => current.is_some(),
        };
        if same_line {
            pending.push(row);
        } else {
            // back to an earlier line: close the open line, then continue
            // without source text until a later line starts
            flush_line(&mut rows, source, current.take(), &mut pending);
            rows.push(String::new(), row, String::new());
        }
    }
    flush_line(&mut rows, source, current, &mut pending);

    // Trailing rows
    for line in next_line..source.end_line() {
        let text = source.line(line).unwrap_or_default().to_string();
        rows.push(text, InstructionRow::Blank, String::new());
    }

    trace!(
        "aligned {} instructions with {} source lines into {} rows",
        instructions.len(),
        source.lines.len(),
        rows.len()
    );
    Ok(rows)
}

/// Emit the collected instructions of `line`, pairing its text with the last one
fn flush_line(
    rows: &mut AlignedRows,
    source: &SourceText,
    line: Option<usize>,
    pending: &mut Vec<InstructionRow>,
) {
    let Some(line) = line else {
        return;
    };
    let Some(last) = pending.pop() else {
        return;
    };
    for row in pending.drain(..) {
        rows.push(String::new(), row, String::new());
    }
    rows.push_line(source, line, last);
}

fn align_without_source(instructions: &[Instruction], jump_colors: &JumpColorMap) -> AlignedRows {
    let mut rows = AlignedRows::with_capacity(instructions.len() + 1);
    rows.push(
        NO_SOURCE_SENTINEL.to_string(),
        InstructionRow::Blank,
        String::new(),
    );
    for instr in instructions {
        rows.push(
            String::new(),
            InstructionRow::from_instruction(instr, jump_colors),
            String::new(),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(rows: &AlignedRows) -> Vec<Option<String>> {
        rows.instructions
            .iter()
            .map(|row| row.cells().map(|c| c.offset.text.clone()))
            .collect()
    }

    #[test]
    fn test_single_line_function() {
        let source = SourceText::new(1, ["def f():", "    pass"]);
        let instructions = vec![Instruction::new(0, "RETURN_CONST").on_line(2)];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(rows.source, vec!["def f():", "    pass"]);
        assert_eq!(rows.numbers, vec!["1", "2"]);
        assert!(rows.instructions[0].is_blank());
        assert_eq!(offsets(&rows)[1].as_deref(), Some("0"));
    }

    #[test]
    fn test_text_pairs_with_last_instruction_of_line() {
        let source = SourceText::new(1, ["def f():", "    return x"]);
        let instructions = vec![
            Instruction::new(0, "LOAD_FAST").with_operand(0, "x").on_line(2),
            Instruction::new(2, "RETURN_VALUE").on_line(2),
        ];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(rows.source, vec!["def f():", "", "    return x"]);
        assert_eq!(rows.numbers, vec!["1", "", "2"]);
        assert_eq!(
            offsets(&rows),
            vec![None, Some("0".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_continuation_instructions_stack_above_the_text() {
        let source = SourceText::new(5, ["def g(a):", "    b = a + 1", "    return b"]);
        let instructions = vec![
            Instruction::new(0, "LOAD_FAST").on_line(6),
            Instruction::new(2, "LOAD_CONST"),
            Instruction::new(4, "BINARY_ADD"),
            Instruction::new(6, "STORE_FAST"),
            Instruction::new(8, "LOAD_FAST").on_line(7),
            Instruction::new(10, "RETURN_VALUE"),
        ];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(
            rows.source,
            vec!["def g(a):", "", "", "", "    b = a + 1", "", "    return b"]
        );
        assert_eq!(rows.numbers, vec!["5", "", "", "", "6", "", "7"]);
        assert_eq!(rows.instructions.iter().filter(|r| !r.is_blank()).count(), 6);
    }

    #[test]
    fn test_skipped_lines_get_rows_and_blank_lines_no_number() {
        let source = SourceText::new(
            1,
            ["def f():", "    x = 1", "", "    # note", "    return x"],
        );
        let instructions = vec![
            Instruction::new(0, "STORE_FAST").on_line(2),
            Instruction::new(2, "RETURN_VALUE").on_line(5),
        ];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows.numbers, vec!["1", "2", "", "4", "5"]);
        assert!(rows.instructions[2].is_blank());
        assert!(rows.instructions[3].is_blank());
        assert!(!rows.instructions[4].is_blank());
    }

    #[test]
    fn test_trailing_lines() {
        let source = SourceText::new(1, ["def f():", "    return g(", "        1,", "    )"]);
        let instructions = vec![Instruction::new(0, "CALL").on_line(2)];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows.numbers, vec!["1", "2", "", ""]);
        assert!(rows.instructions[2].is_blank());
        assert!(rows.instructions[3].is_blank());
    }

    #[test]
    fn test_backward_line_is_a_continuation() {
        let source = SourceText::new(1, ["def f():", "    while x:", "        y()"]);
        let instructions = vec![
            Instruction::new(0, "LOAD_FAST").on_line(2),
            Instruction::new(2, "CALL").on_line(3),
            Instruction::new(4, "JUMP_BACKWARD").on_line(2),
        ];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(rows.source, vec!["def f():", "    while x:", "        y()", ""]);
        assert_eq!(rows.numbers, vec!["1", "2", "3", ""]);
        assert_eq!(
            offsets(&rows),
            vec![
                None,
                Some("0".to_string()),
                Some("2".to_string()),
                Some("4".to_string())
            ]
        );
    }

    #[test]
    fn test_loop_body_keeps_its_text() {
        let source = SourceText::new(1, ["def f(xs):", "    for x in xs:", "        g(x)"]);
        let instructions = vec![
            Instruction::new(0, "RESUME").on_line(1),
            Instruction::new(2, "LOAD_FAST").on_line(2),
            Instruction::new(4, "GET_ITER"),
            Instruction::new(6, "FOR_ITER").jump_target(),
            Instruction::new(10, "STORE_FAST"),
            Instruction::new(12, "LOAD_GLOBAL").on_line(3),
            Instruction::new(22, "LOAD_FAST"),
            Instruction::new(24, "CALL"),
            Instruction::new(32, "POP_TOP"),
            Instruction::new(34, "JUMP_BACKWARD").on_line(2),
            Instruction::new(36, "END_FOR").jump_target(),
            Instruction::new(38, "RETURN_CONST"),
        ];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();
        let paired: Vec<(&str, Option<&str>)> = rows
            .iter()
            .filter(|(text, _, _)| !text.is_empty())
            .map(|(text, row, _)| (text, row.cells().map(|c| c.mnemonic.text.as_str())))
            .collect();

        assert_eq!(
            paired,
            vec![
                ("def f(xs):", Some("RESUME")),
                ("    for x in xs:", Some("STORE_FAST")),
                ("        g(x)", Some("POP_TOP")),
            ]
        );
        assert_eq!(rows.len(), instructions.len());
        assert!(rows.source[9..].iter().all(String::is_empty));
        assert!(rows.numbers[9..].iter().all(String::is_empty));
    }

    #[test]
    fn test_repeated_line_stays_on_that_line() {
        let source = SourceText::new(1, ["def f():", "    return x"]);
        let instructions = vec![
            Instruction::new(0, "LOAD_FAST").on_line(2),
            Instruction::new(2, "RETURN_VALUE").on_line(2),
        ];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(rows.source, vec!["def f():", "", "    return x"]);
        assert_eq!(offsets(&rows)[2].as_deref(), Some("2"));
    }

    #[test]
    fn test_first_instruction_without_line() {
        let source = SourceText::new(1, ["def f():", "    pass"]);
        let instructions = vec![
            Instruction::new(0, "RESUME"),
            Instruction::new(2, "RETURN_CONST").on_line(2),
        ];

        let rows = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(rows.source, vec!["def f():", "    pass"]);
        assert_eq!(rows.numbers, vec!["1", "2"]);
        assert!(!rows.instructions[0].is_blank());
    }

    #[test]
    fn test_no_source_sentinel() {
        let instructions = vec![
            Instruction::new(0, "LOAD_CONST").on_line(1),
            Instruction::new(2, "RETURN_VALUE"),
        ];

        let rows = align(&instructions, None, &JumpColorMap::default()).unwrap();

        assert_eq!(rows.source, vec![NO_SOURCE_SENTINEL, "", ""]);
        assert_eq!(rows.numbers, vec!["", "", ""]);
        assert!(rows.instructions[0].is_blank());
        assert_eq!(rows.number_width(), 1);
    }

    #[test]
    fn test_no_instructions_is_all_leading_rows() {
        let source = SourceText::new(3, ["class C:", "    x = 1"]);

        let rows = align(&[], Some(&source), &JumpColorMap::default()).unwrap();

        assert_eq!(rows.source, vec!["class C:", "    x = 1"]);
        assert_eq!(rows.numbers, vec!["3", ""]);
        assert!(rows.instructions.iter().all(InstructionRow::is_blank));
    }

    #[test]
    fn test_unsorted_offsets_fail() {
        let source = SourceText::new(1, ["def f():", "    pass"]);
        let instructions = vec![
            Instruction::new(4, "NOP").on_line(2),
            Instruction::new(2, "RETURN_VALUE"),
        ];

        let err = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnsortedInstructions {
                offset: 2,
                previous: 4
            }
        );
    }

    #[test]
    fn test_line_out_of_range_fails() {
        let source = SourceText::new(10, ["def f():", "    pass"]);
        let instructions = vec![Instruction::new(0, "NOP").on_line(12)];

        let err = align(&instructions, Some(&source), &JumpColorMap::default()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::LineOutOfRange {
                offset: 0,
                line: 12,
                first: 10,
                last: 11
            }
        ));
    }

    #[test]
    fn test_jump_cells_are_colored() {
        let source = SourceText::new(1, ["def f():", "    if x:", "        return 1", "    return 2"]);
        let instructions = vec![
            Instruction::new(0, "LOAD_FAST").on_line(2),
            Instruction::new(2, "POP_JUMP_IF_FALSE").with_operand(4, "to 8"),
            Instruction::new(4, "LOAD_CONST").on_line(3),
            Instruction::new(6, "RETURN_VALUE"),
            Instruction::new(8, "LOAD_CONST").on_line(4).jump_target(),
            Instruction::new(10, "RETURN_VALUE"),
        ];
        let mut colors = JumpColorMap::default();
        colors.insert(8, Color::Cyan);

        let rows = align(&instructions, Some(&source), &colors).unwrap();
        let cells: Vec<&InstructionCells> =
            rows.instructions.iter().filter_map(InstructionRow::cells).collect();

        let jump = cells.iter().find(|c| c.offset.text == "2").unwrap();
        assert_eq!(jump.operand_text.color, Some(Color::Cyan));
        assert_eq!(jump.operand.color, Some(Color::Cyan));

        let target = cells.iter().find(|c| c.offset.text == "8").unwrap();
        assert_eq!(target.offset.color, Some(Color::Cyan));
        assert_eq!(target.operand_text.color, None);
    }
}
