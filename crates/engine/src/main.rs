use engine::buffer::{BufferContext, LineIndexedText, TextBuffer};
use engine::runtime::boot;

/// Demo host: detect the format of a log file and print the event grouping
/// of its leading lines.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let (engine, _config) = boot::boot(Vec::new())?;

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: engine <logfile> [max-lines]")?;
    let max_lines = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(50usize);

    let buffer = LineIndexedText::new(std::fs::read_to_string(&path)?);
    let ctx = BufferContext::new();

    let detected = engine.resolver.detector().detect(&buffer, &ctx);
    match detected.matcher() {
        Some(matcher) => println!("format: {}", matcher.name()),
        None => println!("format: (undetermined)"),
    }

    let mut line = 0;
    while line < buffer.line_count().min(max_lines) {
        let Some(range) = engine.resolver.event_range(&buffer, &ctx, line) else {
            break;
        };
        let lines = range.end - range.start + 1;
        println!(
            "[{:>5}..{:>5}] ({} line{}) {}",
            range.start,
            range.end,
            lines,
            if lines == 1 { "" } else { "s" },
            buffer.line_text(range.start)
        );
        line = range.end + 1;
    }

    Ok(())
}
