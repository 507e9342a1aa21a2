//! Command-line interface and per-trial stack assembly

use crate::io::configuration::{IMAGE_EXTENSION, STACK_DIRECTORY};
use crate::io::error::{Result, StackError};
use crate::io::image::{load_frames, write_stack};
use crate::io::listing::list_image_files;
use crate::io::progress::ProgressManager;
use crate::stack::frames::FrameStack;
use crate::trial::ranges::{TrialRange, parse_trial_ranges};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "stackbuilder")]
#[command(
    author,
    version,
    about = "Given some images and a series of ranges, build stacks"
)]
/// Command-line arguments for the stack builder
pub struct Cli {
    /// Directory containing the numbered input frames
    #[arg(short = 'i', long = "input_image_directory", value_name = "DIR")]
    pub input_image_directory: PathBuf,

    /// Named frame ranges for the stacks, e.g. "A 1:32 B 33:47"
    #[arg(short = 'r', long = "image_ranges", value_name = "RANGES")]
    pub image_ranges: String,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Assembles one stack per parsed trial, strictly in parsed order
pub struct StackProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl StackProcessor {
    /// Create a new processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the whole pipeline: list, parse, then assemble trial by trial
    ///
    /// Trials already written stay on disk when a later trial fails; the
    /// failure aborts the remaining trials.
    ///
    /// # Errors
    ///
    /// Returns an error if the range description is malformed, the input
    /// directory is unreadable, the output directory cannot be created,
    /// or any trial fails to decode, stack or write.
    pub fn process(&mut self) -> Result<()> {
        let files = list_image_files(&self.cli.input_image_directory)?;
        let trials = parse_trial_ranges(&self.cli.image_ranges)?;

        let output_directory = self.cli.input_image_directory.join(STACK_DIRECTORY);
        ensure_stack_directory(&output_directory)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(trials.len());
        }

        for trial in &trials {
            build_stack(
                trial,
                &files,
                &output_directory,
                self.progress_manager.as_ref(),
            )?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }
}

/// Create the output directory, treating "already exists" as success
///
/// # Errors
///
/// Returns [`StackError::DirectoryCreate`] for any other creation failure.
fn ensure_stack_directory(path: &Path) -> Result<()> {
    match std::fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(source) if source.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(StackError::DirectoryCreate {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// An empty selection is handed to the codec unchanged; it fails there and
// aborts the run, like any other codec failure.
fn build_stack(
    trial: &TrialRange,
    files: &[PathBuf],
    output_directory: &Path,
    progress: Option<&ProgressManager>,
) -> Result<()> {
    let selected = trial.select(files);
    if let Some(pm) = progress {
        pm.start_trial(&trial.name, selected);
    }

    let frames = load_frames(selected)?;
    let stacked = FrameStack::from_frames(&frames)?;

    let output_path = output_directory.join(format!("{}.{IMAGE_EXTENSION}", trial.name));
    write_stack(&output_path, &stacked)?;

    if let Some(pm) = progress {
        pm.complete_trial(&trial.name, &output_path);
    }

    Ok(())
}
