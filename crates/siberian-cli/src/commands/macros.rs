//! `siberian macros`: List the registered macros.

use std::io::Write;

use siberian_macros::{MacroKind, MacroRegistry};
use termcolor::{ColorSpec, WriteColor};

use crate::output::StyledOutput;

pub fn execute<O: WriteColor, E: WriteColor>(output: &mut StyledOutput<O, E>) -> std::io::Result<()> {
    let kinds: Vec<MacroKind> = MacroRegistry::global().kinds().collect();
    let width = kinds.iter().map(|k| k.name().len()).max().unwrap_or(0) + 1;

    for kind in kinds {
        let mut bold = ColorSpec::new();
        bold.set_bold(true);
        output.out.set_color(&bold)?;
        write!(output.out, "@{:<width$}", kind.name(), width = width)?;
        output.out.reset()?;
        writeln!(
            output.out,
            " {:<6}  {:<20}  {}",
            kind.role().as_str(),
            kind.attaches_to(),
            kind.description()
        )?;
    }
    output.out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    #[test]
    fn test_lists_every_macro() {
        let mut output = StyledOutput::with_writers(Buffer::no_color(), Buffer::no_color());
        execute(&mut output).unwrap();
        let text = String::from_utf8_lossy(output.out.as_slice()).to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("@AutoMockable          peer    protocol"));
        assert!(lines[3].starts_with("@CodableKey            member  property"));
    }
}
