use std::path::{Path, PathBuf};

use anyhow::Context;

use ubxlog::{
    decode_command_line, decode_response_line, ConsoleReport, Frame, Report, COMMAND_MARKER,
    RESPONSE_MARKER,
};

/// Appended to the output file name when the user gives no extension.
const OUTPUT_EXTENSION: &str = "ubx";

#[derive(clap::Parser, Debug)]
#[command(
    version,
    about = "Find the GNSS traffic in ubxlib log output and write it to a file \
             that uCenter can open"
)]
pub struct ExtractOpts {
    /// A file containing the ubxlib log output.
    input_file: PathBuf,

    /// The output file name; if the file exists it will be overwritten.
    output_file: PathBuf,

    /// Include only the responses from the GNSS device (i.e. leave out
    /// any commands sent to the GNSS device).
    #[arg(short)]
    responses_only: bool,
}

impl crate::ToolRun for ExtractOpts {
    fn run(&self) -> anyhow::Result<()> {
        run(
            &self.input_file,
            &self.output_file,
            self.responses_only,
            &mut ConsoleReport,
        )
    }
}

/// The whole run: read the log, pull the frames out, write them.
///
/// Fails for the two file-level conditions only, a missing input file and
/// a log with no traffic in it; per-line problems are warnings.
pub fn run<R>(
    input_file: &Path,
    output_file: &Path,
    responses_only: bool,
    report: &mut R,
) -> anyhow::Result<()>
where
    R: Report,
{
    if !input_file.is_file() {
        anyhow::bail!("\"{}\" is not a file", input_file.display());
    }

    report.info(&format!("Reading file {}...", input_file.display()));
    let text = std::fs::read_to_string(input_file)
        .with_context(|| format!("failed to read {}", input_file.display()))?;

    if responses_only {
        report.info(&format!(
            "Looking for lines containing \"{}\"...",
            RESPONSE_MARKER
        ));
    } else {
        report.info(&format!(
            "Looking for lines containing \"{}\" and \"{}\"...",
            RESPONSE_MARKER, COMMAND_MARKER
        ));
    }

    let frames = extract_frames(&text, responses_only, report);
    if frames.is_empty() {
        anyhow::bail!("no GNSS traffic found in {}", input_file.display());
    }

    let output_file = default_extension(output_file);
    report.info(&format!(
        "Writing {} UBX message(s) to file {}...",
        frames.len(),
        output_file.display()
    ));

    let mut file = std::fs::File::create(&output_file)
        .with_context(|| format!("failed to create {}", output_file.display()))?;
    for frame in &frames {
        frame.write_to(&mut file)?;
    }

    report.info(&format!(
        "File {} has been written: you may open it in uCenter.",
        output_file.display()
    ));
    Ok(())
}

/// Pull every frame out of the log text, in encounter order.
///
/// Lines are numbered from 1. The response marker is checked first, so it
/// wins if a line somehow carries both markers. Empty frames are what the
/// decoders produce for lines they had to give up on; they never reach
/// the output.
pub fn extract_frames<R>(text: &str, responses_only: bool, report: &mut R) -> Vec<Frame>
where
    R: Report,
{
    let mut frames = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;

        let frame = if let Some(at) = line.find(RESPONSE_MARKER) {
            decode_response_line(line_number, &line[at + RESPONSE_MARKER.len()..], report)
        } else if !responses_only {
            match line.find(COMMAND_MARKER) {
                Some(at) => {
                    decode_command_line(line_number, &line[at + COMMAND_MARKER.len()..], report)
                }
                None => continue,
            }
        } else {
            continue;
        };

        if !frame.is_empty() {
            frames.push(frame);
        }
    }
    frames
}

fn default_extension(path: &Path) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(OUTPUT_EXTENSION)
    } else {
        path.to_path_buf()
    }
}
