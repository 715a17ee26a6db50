use crate::cli::args::{IstatArgs, IstatCommand};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::istat::{AdminCode, CodeKind, CodeTranslator, PROVINCES, REGIONS};
use crate::output::{CodeRow, Formatter};

/// Execute istat command
pub fn execute(args: IstatArgs, format: OutputFormat) -> Result<()> {
    let translator = CodeTranslator::new();
    let formatter = Formatter::new(format);

    let output = match args.command {
        IstatCommand::Region { code } => {
            let rows = vec![lookup(&translator, CodeKind::Region, &code)];
            formatter.format_codes("Regione", &rows)?
        }
        IstatCommand::Province { code } => {
            let rows = vec![lookup(&translator, CodeKind::Province, &code)];
            formatter.format_codes("Provincia", &rows)?
        }
        IstatCommand::Regions => formatter.format_codes("Regione", &table_rows(&REGIONS))?,
        IstatCommand::Provinces => formatter.format_codes("Provincia", &table_rows(&PROVINCES))?,
    };

    println!("{}", output);
    Ok(())
}

fn lookup(translator: &CodeTranslator, kind: CodeKind, code: &str) -> CodeRow {
    let code = AdminCode::from(code);
    CodeRow {
        code: CodeTranslator::canonical_key(kind, &code),
        name: translator.translate(kind, &code),
    }
}

fn table_rows(table: &[(&str, &str)]) -> Vec<CodeRow> {
    table
        .iter()
        .map(|(code, name)| CodeRow {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}
