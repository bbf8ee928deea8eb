use line_prefix::LinePrefixWriter;
use std::io::Write;

fn main() -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut writer = LinePrefixWriter::builder()
        .prefix("basic-example:")
        .writer(stdout.lock())
        .build();

    writeln!(&mut writer, "I am prefixed")?;
    write!(&mut writer, "I am written on close")?;

    writer.close()
}
