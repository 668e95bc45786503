//! Rendering node maps to SVG.
//!
//! Layout is delegated to a [`LayoutEngine`]; the stock one pipes DOT into
//! the Graphviz `dot` program. Failures never escape [`render_node_map`]:
//! they are logged and reported back as [`RenderOutcome::Failed`].

use crate::builder::GraphBuilder;
use crate::dot::to_dot;
use nodemap_core::{Node, Role, Settings};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors from a layout engine run.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The layout program couldn't be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout program ran and reported an error.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Something that turns DOT source into an SVG file.
pub trait LayoutEngine {
    /// Lays out `dot` and writes SVG to `output`, replacing any existing file.
    fn write_svg(&self, dot: &str, output: &Path) -> Result<(), LayoutError>;
}

/// Graphviz, run as an external process.
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: String,
    /// Arguments placed before the layout flags.
    args: Vec<String>,
}

impl Default for Graphviz {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl Graphviz {
    /// Uses the given program instead of `dot` from `PATH`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds an argument passed ahead of the layout flags, e.g. `-Gdpi=72`.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Returns the program's version banner (`dot -V`).
    pub fn version(&self) -> Result<String, LayoutError> {
        let output = self
            .command()
            .arg("-V")
            .output()
            .map_err(|source| self.spawn_error(source))?;
        if !output.status.success() {
            return Err(self.failed(output.status, &output.stderr));
        }
        // dot prints its version on stderr
        let banner = if output.stderr.is_empty() {
            output.stdout
        } else {
            output.stderr
        };
        Ok(String::from_utf8_lossy(&banner).trim().to_string())
    }

    fn spawn_error(&self, source: io::Error) -> LayoutError {
        LayoutError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    fn failed(&self, status: ExitStatus, stderr: &[u8]) -> LayoutError {
        LayoutError::Failed {
            program: self.program.clone(),
            status,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}

impl LayoutEngine for Graphviz {
    fn write_svg(&self, dot: &str, output: &Path) -> Result<(), LayoutError> {
        let mut child = self
            .command()
            .arg("-Tsvg")
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        // Feed stdin from a second thread so stderr keeps draining and an
        // early exit still leaves its diagnostic to collect.
        let stdin = child.stdin.take();
        let (written, result) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(dot.as_bytes()),
                None => Ok(()),
            });
            let result = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, result)
        });

        let result = result?;
        if !result.status.success() {
            return Err(self.failed(result.status, &result.stderr));
        }
        written?;
        Ok(())
    }
}

/// Result of a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The map was written to this path.
    Rendered(PathBuf),
    /// Rendering failed with this message.
    Failed(String),
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    /// Splits into a success flag and either the output path or the error.
    pub fn into_parts(self) -> (bool, String) {
        match self {
            Self::Rendered(path) => (true, path.display().to_string()),
            Self::Failed(message) => (false, message),
        }
    }
}

/// Builds the node map and writes it to `<static_root>/img/node_map.svg`.
///
/// Any earlier render at that path is overwritten. Concurrent renders are
/// not serialized.
pub fn render_node_map(
    nodes: &[Node],
    roles: &[Role],
    show_hostnames: bool,
    settings: &Settings,
    engine: &dyn LayoutEngine,
) -> RenderOutcome {
    let map = GraphBuilder::new(settings)
        .show_hostnames(show_hostnames)
        .build(nodes, roles);
    let dot = to_dot(&map, &settings.graph_style);
    let output = settings.node_map_path();
    debug!("Rendering {} bytes of DOT to {}", dot.len(), output.display());

    match write_output(engine, &dot, &output) {
        Ok(()) => {
            info!("Rendered node map to {}", output.display());
            RenderOutcome::Rendered(output)
        }
        Err(e) => {
            error!("Graphviz error: {}", e);
            RenderOutcome::Failed(e.to_string())
        }
    }
}

fn write_output(engine: &dyn LayoutEngine, dot: &str, output: &Path) -> Result<(), LayoutError> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    engine.write_svg(dot, output)
}
