use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{ArgGroup, Parser};
use interpreter::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Interpreter for the brisk scripting language
#[derive(Parser)]
#[command(name = "brisk", version)]
#[command(group(ArgGroup::new("mode").required(true).args(["file", "expression", "interactive"])))]
struct Cli {
    /// Script file to run
    file: Option<PathBuf>,

    /// Evaluate the given source and print the values it produces
    #[arg(short, long)]
    expression: Option<String>,

    /// Start an interactive session
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let stdout: Rc<RefCell<io::Stdout>> = Rc::new(RefCell::new(io::stdout()));
    let mut interpreter = Interpreter::new(stdout);

    if let Some(file) = cli.file {
        return run_file(&mut interpreter, &file);
    }

    if let Some(expression) = cli.expression {
        return run_expression(&mut interpreter, &expression);
    }

    repl(&mut interpreter)
}

// A script announces its results itself through print, produced values
// are discarded.
fn run_file(interpreter: &mut Interpreter, file: &Path) -> ExitCode {
    let src = match fs::read_to_string(file) {
        Ok(src) => src,
        Err(err) => {
            eprintln!("{}: {}", file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    match interpreter.evaluate(&src) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_expression(interpreter: &mut Interpreter, expression: &str) -> ExitCode {
    match interpreter.evaluate(expression) {
        Ok(values) => {
            for value in values {
                println!("{}", value);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn repl(interpreter: &mut Interpreter) -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { ">>> " } else { "... " };

        match editor.readline(prompt) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());

                // A blank line always submits whatever is buffered.
                if line.trim().is_empty() {
                    submit(interpreter, &mut buffer);
                    continue;
                }

                buffer.push_str(&line);
                buffer.push('\n');

                if input_complete(&buffer) {
                    submit(interpreter, &mut buffer);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Bye!");
                return ExitCode::SUCCESS;
            }
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    }
}

fn submit(interpreter: &mut Interpreter, buffer: &mut String) {
    let src = buffer.trim();
    if src.is_empty() {
        return;
    }

    match interpreter.evaluate(src) {
        Ok(values) => {
            for value in values {
                println!("{}", value);
            }
        }
        Err(err) => eprintln!("{}", err),
    }

    buffer.clear();
}

// Buffered input is ready once it ends with a statement period outside of
// any open block. Keywords and periods inside string literals do not
// count, and an unterminated string keeps the input open.
fn input_complete(buffer: &str) -> bool {
    let trimmed = buffer.trim_end();
    if !trimmed.ends_with('.') {
        return false;
    }

    let mut depth: i32 = 0;
    let mut rest = trimmed;

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('"') {
            match stripped.find('"') {
                Some(close) => rest = &stripped[close + 1..],
                None => return false,
            }
            continue;
        }

        let word_end = rest
            .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
            .unwrap_or(rest.len());

        if word_end == 0 {
            let ch_len = rest.chars().next().map_or(1, char::len_utf8);
            rest = &rest[ch_len..];
            continue;
        }

        match &rest[..word_end] {
            "if" | "while" | "routine" => depth += 1,
            "end" => depth -= 1,
            _ => {}
        }
        rest = &rest[word_end..];
    }

    depth <= 0
}
