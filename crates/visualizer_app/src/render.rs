use std::io::{self, Write};

use visualizer_core::{AppViewModel, Phase, RenderTarget, ServiceReadiness};

/// Prints view-model changes as plain lines. Repeated progress reports with
/// the same percentage and message are printed once.
pub struct Renderer<W: Write> {
    out: W,
    last_phase: Option<Phase>,
    last_progress: Option<(u8, String)>,
    last_notice: Option<String>,
    presented: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_phase: None,
            last_progress: None,
            last_notice: None,
            presented: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if self.last_phase != Some(view.phase) {
            self.render_phase(view)?;
            self.last_phase = Some(view.phase);
        }

        if view.phase == Phase::Polling {
            let progress = (view.progress, view.message.clone());
            if self.last_progress.as_ref() != Some(&progress) {
                writeln!(self.out, "[{:>3}%] {}", progress.0, progress.1)?;
                self.last_progress = Some(progress);
            }
        }

        match &view.presentation {
            Some(target) if !self.presented => {
                render_target(&mut self.out, target)?;
                self.presented = true;
            }
            Some(_) => {}
            None => self.presented = false,
        }

        if view.notice != self.last_notice {
            if let Some(notice) = &view.notice {
                writeln!(self.out, "Error: {notice}")?;
            }
            self.last_notice = view.notice.clone();
        }
        self.out.flush()
    }

    fn render_phase(&mut self, view: &AppViewModel) -> io::Result<()> {
        match view.phase {
            Phase::Idle | Phase::Polling | Phase::Completed | Phase::Failed => Ok(()),
            Phase::Submitting => {
                self.last_progress = None;
                writeln!(
                    self.out,
                    "Submitting: {}",
                    view.query.as_deref().unwrap_or_default()
                )
            }
            Phase::Cancelled => writeln!(
                self.out,
                "Cancelled. The service may still finish the task on its own."
            ),
        }
    }
}

pub fn render_readiness<W: Write>(out: &mut W, readiness: &ServiceReadiness) -> io::Result<()> {
    match readiness {
        ServiceReadiness::Ready => writeln!(out, "Service ready."),
        ServiceReadiness::Misconfigured { message } => {
            writeln!(out, "Service misconfigured: {message}")
        }
        ServiceReadiness::Offline => writeln!(out, "Service offline."),
    }
}

fn render_target<W: Write>(out: &mut W, target: &RenderTarget) -> io::Result<()> {
    match target {
        RenderTarget::Video { url, title } => {
            writeln!(out, "Video ready: {title}")?;
            writeln!(out, "{url}")
        }
        RenderTarget::Explanation { topic, explanation } => {
            writeln!(out, "# {topic}")?;
            writeln!(out)?;
            writeln!(out, "{explanation}")
        }
    }
}
