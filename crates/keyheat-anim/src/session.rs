#![forbid(unsafe_code)]

//! Protocol session: drives a [`HeatFx`] from host commands.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Unknown or malformed line | `warn!`, line skipped |
//! | Unknown key name | `warn!`, event ignored |
//! | Rejected parameter value | `warn!`, previous value kept |
//! | `keycount` disagrees with declared keys | `warn!`, declared keys win |
//! | Params block left open at `begin run`/`start` | `warn!`, staged values applied |
//! | Timestamp goes backwards | Zero elapsed time |
//! | stdout/stdin failure | Session ends with [`ProtocolError::Io`] |

use std::io::{BufRead, Write};

use keyheat_core::{KeyEvent, Keymap};
use keyheat_fx::{HeatConfig, HeatFx};
use keyheat_render::KeyFrame;
use tracing::{debug, info, warn};

use crate::protocol::{Block, Command, ProtocolError};

/// Whether the session should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One `--ckb-run` session writing frames to `out`.
#[derive(Debug)]
pub struct Session<W: Write> {
    out: W,
    fx: HeatFx,
    keymap: Keymap,
    frame: KeyFrame,
    /// Keymap under construction between `begin keymap` and `end keymap`.
    pending_keymap: Option<Keymap>,
    declared_keys: Option<usize>,
    /// Configuration staged between `begin params` and `end params`.
    pending_config: Option<HeatConfig>,
    last_time: f64,
    running: bool,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, HeatConfig::default())
    }

    pub fn with_config(out: W, config: HeatConfig) -> Self {
        Self {
            out,
            fx: HeatFx::new(config),
            keymap: Keymap::new(),
            frame: KeyFrame::new(0),
            pending_keymap: None,
            declared_keys: None,
            pending_config: None,
            last_time: 0.0,
            running: false,
        }
    }

    #[must_use]
    pub fn fx(&self) -> &HeatFx {
        &self.fx
    }

    #[must_use]
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Whether the host has sent `start` without a matching `stop`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Read and handle lines until end of input or `end run`.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), ProtocolError> {
        for line in input.lines() {
            if self.handle_line(&line?)? == Flow::Exit {
                break;
            }
        }
        debug!(key_count = self.keymap.len(), "animation session finished");
        Ok(())
    }

    /// Parse and handle one line. Recoverable errors are logged and skipped.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow, ProtocolError> {
        match Command::parse(line) {
            Ok(Some(command)) => self.handle(command),
            Ok(None) => Ok(Flow::Continue),
            Err(err) if err.is_recoverable() => {
                warn!("skipping protocol line: {err}");
                Ok(Flow::Continue)
            }
            Err(err) => Err(err),
        }
    }

    pub fn handle(&mut self, command: Command) -> Result<Flow, ProtocolError> {
        match command {
            Command::Begin(Block::Keymap) => {
                self.pending_keymap = Some(Keymap::new());
                self.declared_keys = None;
            }
            Command::End(Block::Keymap) => self.finish_keymap(),
            Command::KeyCount(count) => self.declared_keys = Some(count),
            Command::KeyDef { name, position } => match self.pending_keymap.as_mut() {
                Some(keymap) => {
                    keymap.push(name, position);
                }
                None => warn!(key = %name, "key declaration outside keymap block ignored"),
            },
            Command::Begin(Block::Params) => {
                self.pending_config = Some(self.fx.config().clone());
            }
            Command::End(Block::Params) => {
                if let Some(config) = self.pending_config.take() {
                    self.fx.set_config(config);
                }
            }
            Command::Param { name, value } => self.apply_param(&name, &value),
            Command::Begin(Block::Run) => {
                self.close_open_params("begin run");
                debug!("run block started");
            }
            Command::End(Block::Run) => {
                debug!("run block ended");
                return Ok(Flow::Exit);
            }
            Command::Start => {
                self.close_open_params("start");
                self.running = true;
                info!(effect = self.fx.name(), "animation started");
            }
            Command::Stop => {
                self.running = false;
                info!(effect = self.fx.name(), "animation stopped");
            }
            Command::Key { name, action } => match self.keymap.index_of(&name) {
                Some(index) => {
                    let mut event = KeyEvent::new(index, action);
                    if let Some(key) = self.keymap.get(index) {
                        event = event.with_position(key.position);
                    }
                    self.fx.handle_event(event);
                }
                None => warn!(key = %name, "event for unknown key ignored"),
            },
            Command::Time(seconds) => {
                let delta = seconds - self.last_time;
                self.last_time = seconds;
                self.fx.tick(delta.max(0.0));
            }
            Command::Frame => self.write_frame()?,
        }
        Ok(Flow::Continue)
    }

    fn finish_keymap(&mut self) {
        let Some(keymap) = self.pending_keymap.take() else {
            warn!("end keymap without begin keymap ignored");
            return;
        };
        if let Some(declared) = self.declared_keys.take()
            && declared != keymap.len()
        {
            warn!(
                declared,
                key_count = keymap.len(),
                "keycount disagrees with declared keys"
            );
        }
        self.fx.initialize(keymap.positions());
        self.frame = KeyFrame::new(keymap.len());
        self.keymap = keymap;
    }

    fn close_open_params(&mut self, at: &'static str) {
        if let Some(config) = self.pending_config.take() {
            warn!(at, "params block was not closed; applying staged values");
            self.fx.set_config(config);
        }
    }

    fn apply_param(&mut self, name: &str, value: &str) {
        // Outside a params block a value takes effect immediately.
        let staged = self.pending_config.is_some();
        let mut config = match self.pending_config.take() {
            Some(config) => config,
            None => self.fx.config().clone(),
        };
        match config.apply_param(name, value) {
            Ok(true) => {}
            Ok(false) => debug!(name, "unrecognized parameter ignored"),
            Err(err) => warn!("parameter rejected: {err}"),
        }
        if staged {
            self.pending_config = Some(config);
        } else {
            self.fx.set_config(config);
        }
    }

    fn write_frame(&mut self) -> Result<(), ProtocolError> {
        self.fx.render(&mut self.frame);
        writeln!(self.out, "begin frame")?;
        for (key, color) in self.keymap.iter().zip(self.frame.iter()) {
            writeln!(self.out, "argb {} {:08x}", key.name, color.to_argb_u32())?;
        }
        writeln!(self.out, "end frame")?;
        self.out.flush()?;
        Ok(())
    }
}
