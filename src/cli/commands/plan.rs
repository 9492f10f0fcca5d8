//! `turnplan plan` command - Classify a digest and synthesize a process plan

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use console::style;
use miette::Result;
use tracing::{debug, warn};

use crate::cli::output::{effective_format, emit, serialize};
use crate::cli::report::render_plan;
use crate::cli::{load_planner, GlobalOpts, OutputFormat};
use crate::core::advisory::{attach_advice, Advisor, AdvisoryError};
use crate::core::digest::{DigestFile, GeometryKernel};
use crate::core::planner::PlanRequest;
use crate::core::synthesis::QualityTargets;

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Digest file (YAML or JSON)
    pub digest: PathBuf,

    /// Workpiece material profile
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Lathe machine profile
    #[arg(long)]
    pub machine: Option<String>,

    /// Dimensional tolerance (mm)
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Surface roughness target Ra (µm)
    #[arg(long)]
    pub ra: Option<f64>,

    /// External command that reads a prompt on stdin and prints advice
    #[arg(long, env = "TURNPLAN_ADVISOR")]
    pub advisor: Option<String>,

    /// Seconds to wait for the advisor before giving up
    #[arg(long, env = "TURNPLAN_ADVISOR_TIMEOUT", default_value_t = DEFAULT_ADVISOR_TIMEOUT_SECS)]
    pub advisor_timeout: u64,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Default advisor timeout in seconds
pub const DEFAULT_ADVISOR_TIMEOUT_SECS: u64 = 120;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Advisor backed by an external command
///
/// The prompt is written to the command's stdin; its stdout is the advice.
/// A command still running at the timeout is killed.
#[derive(Debug, Clone)]
pub struct CommandAdvisor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandAdvisor {
    /// Split a command line on whitespace into program and arguments
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            timeout: Duration::from_secs(DEFAULT_ADVISOR_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Advisor for CommandAdvisor {
    fn advise(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let unavailable = |e: std::io::Error| AdvisoryError::Unavailable(format!("{}: {}", self.program, e));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(unavailable)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).map_err(unavailable)?;
        }

        // Drain stdout off-thread so a chatty advisor cannot fill the pipe
        let mut stdout = child.stdout.take();
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(out) = stdout.as_mut() {
                let _ = out.read_to_end(&mut buf);
            }
            buf
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait().map_err(unavailable)? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(program = %self.program, timeout_s = self.timeout.as_secs(), "advisor timed out");
                    return Err(AdvisoryError::Timeout(self.timeout.as_secs()));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let output = reader.join().map_err(|_| {
            AdvisoryError::Unavailable(format!("{}: failed to read output", self.program))
        })?;
        if !status.success() {
            return Err(AdvisoryError::Unavailable(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        let text = String::from_utf8_lossy(&output).trim().to_string();
        if text.is_empty() {
            Err(AdvisoryError::Empty)
        } else {
            Ok(text)
        }
    }
}

pub fn run(args: PlanArgs, global: &GlobalOpts) -> Result<()> {
    let planner = load_planner(global)?;
    let digest = DigestFile.digest(&args.digest)?;
    debug!(path = %args.digest.display(), version = %digest.version, "digest loaded");

    let request = PlanRequest {
        material: args.material,
        machine: args.machine,
        targets: QualityTargets::new(args.tolerance, args.ra),
    };
    let mut outcome = planner.plan(&digest, &request);

    if let Some(advisor) = args.advisor.as_deref().and_then(CommandAdvisor::parse) {
        let advisor = advisor.with_timeout(Duration::from_secs(args.advisor_timeout));
        attach_advice(&mut outcome, &advisor);
    }

    let format = effective_format(args.format, args.output.as_deref());
    let content = match format {
        OutputFormat::Yaml | OutputFormat::Json => serialize(&outcome, format)?,
        OutputFormat::Auto | OutputFormat::Text => {
            if args.output.is_some() {
                console::set_colors_enabled(false);
            }
            render_plan(&outcome)
        }
    };
    emit(&content, args.output.as_deref())?;

    if let Some(path) = &args.output {
        eprintln!(
            "{} Plan for {} written to {}",
            style("✓").green(),
            style(outcome.part.as_deref().unwrap_or("part")).cyan(),
            path.display()
        );
    }
    Ok(())
}
