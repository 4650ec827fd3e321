// Firmware command file format
//
// One line per frame: frame/servo_us/right_ticks/left_ticks
// servo_us is rounded to an integer, ticks are signed decimal.
// No header and no trailing summary line.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ExportError, Result};
use crate::messages::DriveCommand;

const FIELD_SEPARATOR: char = '/';

/// Format one command as a newline-terminated firmware line
pub fn format_line(cmd: &DriveCommand) -> String {
    format!(
        "{}{sep}{}{sep}{}{sep}{}\n",
        cmd.frame,
        cmd.servo_us.round() as i64,
        cmd.cumulative_right_ticks,
        cmd.cumulative_left_ticks,
        sep = FIELD_SEPARATOR
    )
}

/// Render the whole command stream into a single buffer
pub fn to_command_string(commands: &[DriveCommand]) -> String {
    commands.iter().map(format_line).collect()
}

/// Write the command stream to any writer, in sequence order
pub fn write_commands<W: Write>(writer: &mut W, commands: &[DriveCommand]) -> Result<()> {
    for cmd in commands {
        writer.write_all(format_line(cmd).as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the command stream to `output`, replacing it only once fully written
///
/// Lines go to a temporary file next to `output` which is then renamed over
/// it. On failure the temporary file is removed and `output` is untouched.
pub fn write_command_file(output: &Path, commands: &[DriveCommand]) -> Result<()> {
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        write_commands(&mut writer, commands)?;
    }
    file.as_file().sync_all()?;
    file.persist(output).map_err(|e| e.error)?;
    Ok(())
}

/// Parse one firmware line (without its terminator)
///
/// `line_no` is 1-based and only used for error reporting.
pub fn parse_line(line: &str, line_no: usize) -> Result<DriveCommand> {
    let malformed = |reason: String| ExportError::MalformedCommand {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.trim_end_matches('\r').split(FIELD_SEPARATOR).collect();
    if fields.len() != 4 {
        return Err(malformed(format!("expected 4 fields, got {}", fields.len())));
    }

    let frame = fields[0]
        .parse::<i32>()
        .map_err(|e| malformed(format!("frame '{}': {}", fields[0], e)))?;
    let servo_us = fields[1]
        .parse::<i64>()
        .map_err(|e| malformed(format!("servo '{}': {}", fields[1], e)))?;
    let right = fields[2]
        .parse::<i64>()
        .map_err(|e| malformed(format!("right ticks '{}': {}", fields[2], e)))?;
    let left = fields[3]
        .parse::<i64>()
        .map_err(|e| malformed(format!("left ticks '{}': {}", fields[3], e)))?;

    Ok(DriveCommand {
        frame,
        servo_us: servo_us as f64,
        cumulative_right_ticks: right,
        cumulative_left_ticks: left,
    })
}

/// Parse a full command file, skipping blank lines
pub fn parse_commands(text: &str) -> Result<Vec<DriveCommand>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_line(line, i + 1))
        .collect()
}
