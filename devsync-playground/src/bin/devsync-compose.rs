use devsync_playground::{compose, PlaygroundError};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 4 {
        eprintln!("Usage: devsync-compose <markup.html> <style.css> <script.js>");
        eprintln!();
        eprintln!("Prints the composed document to stdout.");
        eprintln!("Use '-' to read one buffer from stdin.");
        process::exit(1);
    }

    if args[1..].iter().filter(|a| a.as_str() == "-").count() > 1 {
        eprintln!("✗ only one buffer can be read from stdin");
        process::exit(1);
    }

    match compose_files(&args[1], &args[2], &args[3]) {
        Ok(document) => print!("{}", document),
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    }
}

fn compose_files(markup: &str, style: &str, script: &str) -> Result<String, PlaygroundError> {
    let markup = read_buffer(markup)?;
    let style = read_buffer(style)?;
    let script = read_buffer(script)?;
    Ok(compose(&markup, &style, &script).into_string())
}

fn read_buffer(path: &str) -> Result<String, PlaygroundError> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| PlaygroundError::io("<stdin>", e))?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| PlaygroundError::io(path, e))
}
