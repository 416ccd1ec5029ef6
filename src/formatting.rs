use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use blindcmp_lib::types::Rect;
use blindcmp_lib::{BlindcmpOutput, CompareError, ErrorOutput, BLINDCMP_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &BlindcmpOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: CompareError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::debug!(error = ?err, "command failed");
    let error_payload = err.to_payload();
    let payload = BlindcmpOutput::Error(ErrorOutput {
        version: BLINDCMP_OUTPUT_VERSION.to_string(),
        message: Some(err.to_string()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal/errors; mismatches use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(
    body: &BlindcmpOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &BlindcmpOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content = serde_json::to_string_pretty(body)
        .unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &BlindcmpOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        BlindcmpOutput::Hash(out) => {
            let header = color("[HASH]", "36", colorize);
            writeln!(buf, "{} {}", header, out.hash).ok();
            writeln!(
                buf,
                "Image: {} ({} blind regions)",
                out.image.display(),
                out.blind_regions
            )
            .ok();
        }
        BlindcmpOutput::Mask(out) => {
            let header = color("[MASK]", "36", colorize);
            writeln!(
                buf,
                "{} {} -> {}",
                header,
                out.image.display(),
                out.output_path.display()
            )
            .ok();
            writeln!(buf, "Blind regions: {}", out.blind_regions).ok();
        }
        BlindcmpOutput::Diff(out) => {
            let changed = !out.bounding_rectangles.is_empty();
            let status = if changed { "CHANGED" } else { "SAME" };
            let status_colored = color(status, if changed { "33" } else { "32" }, colorize);
            writeln!(
                buf,
                "{} {} vs {}",
                status_colored,
                out.baseline.display(),
                out.candidate.display()
            )
            .ok();
            write_rectangles(&mut buf, &out.bounding_rectangles);
            if let Some(path) = &out.diff_image {
                writeln!(buf, "Diff image: {}", path.display()).ok();
            }
        }
        BlindcmpOutput::Match(out) => {
            let status = if out.is_match { "MATCH" } else { "MISMATCH" };
            let status_colored = color(status, if out.is_match { "32" } else { "31" }, colorize);
            writeln!(
                buf,
                "{} {} vs {} [{}]",
                status_colored,
                out.candidate.display(),
                out.baseline.display(),
                out.browser
            )
            .ok();
            writeln!(buf, "Baseline hash: {}", out.expected_hash).ok();
            write_rectangles(&mut buf, &out.bounding_rectangles);
            if let Some(path) = &out.diff_image {
                writeln!(buf, "Diff image: {}", path.display()).ok();
            }
        }
        BlindcmpOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

fn write_rectangles(buf: &mut String, rects: &[Rect]) {
    if rects.is_empty() {
        return;
    }
    writeln!(buf, "Changed areas ({}):", rects.len()).ok();
    for rect in rects {
        writeln!(
            buf,
            "- {}x{} at ({}, {})",
            rect.width, rect.height, rect.left, rect.top
        )
        .ok();
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Determine exit code for the match command.
pub fn exit_code_for_match(is_match: bool) -> ExitCode {
    if is_match {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blindcmp_lib::error::{ErrorCategory, ErrorPayload};
    use blindcmp_lib::{ContentHash, MatchOutput};

    #[test]
    fn exit_code_for_match_maps_match_mismatch() {
        assert_eq!(exit_code_for_match(true), ExitCode::SUCCESS);
        assert_eq!(exit_code_for_match(false), ExitCode::from(1));
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            CompareError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_includes_status_and_rectangles() {
        let output = BlindcmpOutput::Match(MatchOutput {
            version: BLINDCMP_OUTPUT_VERSION.to_string(),
            browser: "chrome".to_string(),
            baseline: PathBuf::from("base.png"),
            candidate: PathBuf::from("cand.png"),
            is_match: false,
            expected_hash: ContentHash::from_hex("beef"),
            bounding_rectangles: vec![Rect::new(49, 49, 12, 12)],
            diff_image: Some(PathBuf::from("diff.png")),
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("MISMATCH cand.png vs base.png [chrome]"));
        assert!(pretty.contains("Baseline hash: beef"));
        assert!(pretty.contains("Changed areas (1):"));
        assert!(pretty.contains("- 12x12 at (49, 49)"));
        assert!(pretty.contains("Diff image: diff.png"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = BlindcmpOutput::Error(ErrorOutput {
            version: BLINDCMP_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload {
                category: ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
