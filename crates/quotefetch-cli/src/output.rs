use std::io::{self, Write};

use quotefetch_core::{ResponseData, ResultEnvelope};

use crate::error::CliError;

/// Writes the envelope as one JSON document on stdout.
pub fn render(envelope: &ResultEnvelope<ResponseData>, pretty: bool) -> Result<(), CliError> {
    let payload = envelope.to_json(pretty)?;
    write_to(&mut io::stdout().lock(), &payload)
}

fn write_to(writer: &mut impl Write, payload: &str) -> Result<(), CliError> {
    writeln!(writer, "{payload}")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_exactly_one_line() {
        let envelope = ResultEnvelope::<ResponseData>::failure("No arguments provided.");
        let payload = envelope.to_json(false).expect("serializable");

        let mut buffer = Vec::new();
        write_to(&mut buffer, &payload).expect("in-memory write");

        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim()).expect("json");
        assert_eq!(value["success"], false);
    }
}
