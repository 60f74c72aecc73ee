//! Line buffer shared by the text backends.
//!
//! Each generation run builds its own `Emitter`, so indentation depth and
//! label numbering never leak between runs or between backends.

use crate::error::CoreError;

#[derive(Debug)]
pub(crate) struct Emitter {
    indent_text: String,
    level: usize,
    lines: Vec<String>,
    labels: usize,
}

impl Emitter {
    pub(crate) fn new(indent_text: impl Into<String>) -> Self {
        Emitter {
            indent_text: indent_text.into(),
            level: 0,
            lines: Vec::new(),
            labels: 0,
        }
    }

    /// Push one line at the current indentation.
    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
            return;
        }
        let mut line = self.indent_text.repeat(self.level);
        line.push_str(text);
        self.lines.push(line);
    }

    /// Next label number. Numbers are shared by all label prefixes of a run.
    pub(crate) fn next_label(&mut self) -> usize {
        self.labels += 1;
        self.labels
    }

    #[cfg(test)]
    pub(crate) fn level(&self) -> usize {
        self.level
    }

    /// Join all lines, ending with a newline.
    pub(crate) fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Scoped indentation for anything that writes through an [`Emitter`].
///
/// Generators that carry extra state next to their emitter implement this
/// so nested callbacks can still reach that state.
pub(crate) trait Indent {
    fn emitter(&mut self) -> &mut Emitter;

    /// Run `body` one level deeper. The level is restored on every exit
    /// path, including errors.
    fn indented<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        self.emitter().level += 1;
        let result = body(self);
        self.emitter().level -= 1;
        result
    }
}

impl Indent for Emitter {
    fn emitter(&mut self) -> &mut Emitter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_nested_lines() {
        let mut emitter = Emitter::new("  ");
        emitter.line("(a");
        emitter
            .indented(|e| {
                e.line("b");
                Ok(())
            })
            .unwrap();
        emitter.line(")");
        assert_eq!(emitter.finish(), "(a\n  b\n)\n");
    }

    #[test]
    fn restores_level_after_error() {
        let mut emitter = Emitter::new("    ");
        let result: Result<(), _> = emitter.indented(|e| {
            e.indented(|_| Err(CoreError::undeclared("x")))
        });
        assert!(result.is_err());
        assert_eq!(emitter.level(), 0);
    }

    #[test]
    fn labels_increase_monotonically() {
        let mut emitter = Emitter::new("");
        assert_eq!(emitter.next_label(), 1);
        assert_eq!(emitter.next_label(), 2);
    }

    #[test]
    fn blank_lines_carry_no_indent() {
        let mut emitter = Emitter::new("  ");
        emitter
            .indented(|e| {
                e.line("");
                Ok(())
            })
            .unwrap();
        assert_eq!(emitter.finish(), "\n");
    }
}
