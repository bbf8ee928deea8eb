use line_prefix::termcolor::{
    Color,
    ColorSpec,
};
use line_prefix::LinePrefixWriter;
use std::io::Write;
use std::thread;
use std::time::Duration;
use time::macros::format_description;
use time::OffsetDateTime;

fn now() -> String {
    OffsetDateTime::now_utc()
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_default()
}

fn worker(name: &'static str, color: Color, delay: Duration) -> thread::JoinHandle<std::io::Result<()>> {
    thread::spawn(move || {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color));

        let writer = LinePrefixWriter::builder()
            .prefix(format!("{name:>5} |"))
            .prefix_fn(|| format!(" {}", now()))
            .color(spec)
            .build();

        for sequence in 0..5 {
            // partial writes are held back until the line is complete
            write!(&writer, "reply from {name}: ")?;
            thread::sleep(delay);
            writeln!(&writer, "seq={sequence}")?;
        }

        writer.close()
    })
}

fn main() -> std::io::Result<()> {
    let handles = [
        worker("web", Color::Blue, Duration::from_millis(150)),
        worker("db", Color::Green, Duration::from_millis(230)),
        worker("queue", Color::Magenta, Duration::from_millis(310)),
    ];

    for handle in handles {
        handle.join().expect("worker panicked")?;
    }

    Ok(())
}
