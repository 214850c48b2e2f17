use super::GeneratorOptions;
use crate::graph::ParamValue;

/// The pieces a finished strategy module is built from.
pub(super) struct Sections<'a> {
    pub name: &'a str,
    pub imports: &'a [String],
    pub parameters: &'a [(String, ParamValue)],
    pub lookback: usize,
    pub statements: &'a [String],
}

/// Lays out the module: docstring, imports, class with its parameter
/// block, and the guarded per-bar entry point.
pub(super) fn assemble(options: &GeneratorOptions, sections: &Sections<'_>) -> String {
    let unit = " ".repeat(options.indent.max(1));
    let class_indent = unit.clone();
    let body_indent = unit.repeat(2);

    let mut lines: Vec<String> = vec![
        "\"\"\"".to_string(),
        sections.name.to_string(),
        options.header_line.clone(),
        "\"\"\"".to_string(),
    ];

    if !options.base_import.is_empty() {
        lines.push(options.base_import.clone());
    }
    lines.extend(
        sections
            .imports
            .iter()
            .filter(|line| **line != options.base_import)
            .cloned(),
    );
    lines.push(String::new());
    lines.push(String::new());

    lines.push(format!("class {}({}):", sections.name, options.base_class));
    lines.push(format!("{}\"\"\"{}\"\"\"", class_indent, sections.name));
    lines.push(String::new());

    if !sections.parameters.is_empty() {
        lines.push(format!("{}# Strategy parameters", class_indent));
        for (key, value) in sections.parameters {
            lines.push(format!("{}{} = {}", class_indent, key, value.literal()));
        }
        lines.push(String::new());
    }

    lines.push(format!("{}def on_bar(self, bar):", class_indent));
    lines.push(format!("{}\"\"\"Called once per bar.\"\"\"", body_indent));

    if sections.lookback > 1 {
        lines.push(format!("{}# Ensure enough history is available", body_indent));
        lines.push(format!(
            "{}if len(self.{}({})) < {}:",
            body_indent, options.data_accessor, sections.lookback, sections.lookback
        ));
        lines.push(format!("{}{}return", body_indent, unit));
        lines.push(String::new());
    }

    if sections.statements.is_empty() {
        lines.push(format!("{}pass", body_indent));
    } else {
        for statement in sections.statements {
            for line in statement.lines() {
                lines.push(format!("{}{}", body_indent, reindent(line, &unit)));
            }
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Statements are written with four-space nesting; map each level onto the
/// configured indent unit.
fn reindent(line: &str, unit: &str) -> String {
    let trimmed = line.trim_start_matches(' ');
    let leading = line.len() - trimmed.len();
    format!("{}{}{}", unit.repeat(leading / 4), " ".repeat(leading % 4), trimmed)
}

pub(super) fn validation_failure(issues: &[String]) -> String {
    let mut text = String::from("\"\"\"\nBlueprint validation failed:\n");
    for issue in issues {
        text.push_str("# Error: ");
        text.push_str(&docstring_safe(issue));
        text.push('\n');
    }
    text.push_str("\"\"\"");
    text
}

pub(super) fn blocked(reason: &str) -> String {
    format!("\"\"\"\n{}\n\"\"\"", docstring_safe(reason))
}

/// Issue text embeds node ids verbatim; a quote must not end the docstring.
fn docstring_safe(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
