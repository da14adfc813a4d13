//! Relay images between public registries and a private registry
//!
//! ```text
//! pull      gcr.io/a/b:t  -> pull <mirror>/a.b:t -> tag as gcr.io/a/b:t -> remove <mirror>/a.b:t
//! push      gcr.io/a/b:t  -> tag as <address>/a/b:t -> push -> remove <address>/a/b:t
//! redirect  pull, then push, then remove gcr.io/a/b:t
//! ```
//!
//! Every engine failure aborts the sequence, except the removal of temporary
//! names which is only logged.

use crate::{
    config::{Config, Credentials},
    engine::{Engine, PullEvent},
    error::*,
    rewrite,
};
use std::io::Write;

/// Print a message of the pull stream
///
/// A transfer in progress overwrites its own line with `\r`.
/// An error message in the stream is returned as [Error::PullFailed].
pub fn render_event(out: &mut dyn Write, event: &PullEvent) -> Result<()> {
    if let Some(message) = event.error_message() {
        return Err(Error::PullFailed(message));
    }
    match event.progress() {
        Some((current, total)) if current < total => {
            write!(out, "{:>20} {} {}/{}\r", event.status, event.id, current, total)?;
            out.flush()?;
        }
        Some((current, total)) => {
            writeln!(out, "{:>20} {} {}/{}", event.status, event.id, current, total)?
        }
        None => writeln!(out, "{}", event.status)?,
    }
    Ok(())
}

/// Operation requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Pull { image: String },
    Push { image: String, address: String },
    Redirect { image: String, address: String },
}

/// Run the operation on the engine made by `connect`
///
/// Credentials of `push` and `redirect` are read through `lookup` before
/// `connect` is called, so a missing variable never reaches the engine.
pub fn run<E, W>(
    operation: &Operation,
    config: Config,
    lookup: impl Fn(&str) -> Option<String>,
    connect: impl FnOnce() -> Result<E>,
    out: W,
) -> Result<()>
where
    E: Engine,
    W: Write,
{
    match operation {
        Operation::Pull { image } => Relay::new(connect()?, config, out).pull(image),
        Operation::Push { image, address } => {
            let credentials = Credentials::from_lookup(lookup)?;
            Relay::new(connect()?, config, out).push(image, address, &credentials)
        }
        Operation::Redirect { image, address } => {
            let credentials = Credentials::from_lookup(lookup)?;
            Relay::new(connect()?, config, out).redirect(image, address, &credentials)
        }
    }
}

pub struct Relay<E, W> {
    engine: E,
    config: Config,
    out: W,
}

impl<E: Engine, W: Write> Relay<E, W> {
    pub fn new(engine: E, config: Config, out: W) -> Self {
        Relay {
            engine,
            config,
            out,
        }
    }

    #[cfg(test)]
    fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    fn into_inner(self) -> (E, W) {
        (self.engine, self.out)
    }

    /// Pull image through the mirror, and leave it under its original name
    pub fn pull(&mut self, image: &str) -> Result<()> {
        let mirror = rewrite::to_mirror(image, &self.config.mirror);
        self.fetch(&mirror)?;
        if mirror != image {
            log::info!("Restoring tag: {}", image);
            self.engine.tag(&mirror, image)?;
            log::info!("Removing temporary tag: {}", mirror);
            self.remove(&mirror);
        }
        Ok(())
    }

    /// Push local image to the private registry at `address`
    pub fn push(&mut self, image: &str, address: &str, credentials: &Credentials) -> Result<()> {
        let private = rewrite::to_private(image, address);
        if private == image {
            log::warn!("No rule for {}, pushing under the same name", image);
            return self.upload(image, credentials);
        }
        log::info!("Private tag: {}", private);
        self.engine.tag(image, &private)?;
        self.upload(&private, credentials)?;
        log::info!("Removing temporary tag: {}", private);
        self.remove(&private);
        Ok(())
    }

    /// Pull from the public registry and push to the private one,
    /// leaving no image in the local store
    pub fn redirect(
        &mut self,
        image: &str,
        address: &str,
        credentials: &Credentials,
    ) -> Result<()> {
        self.pull(image)?;
        self.push(image, address, credentials)?;
        log::info!("Removing image: {}", image);
        self.remove(image);
        Ok(())
    }

    fn fetch(&mut self, image: &str) -> Result<()> {
        log::info!("Pulling image: {}", image);
        let out = &mut self.out;
        self.engine
            .pull(image, &mut |event| render_event(&mut *out, &event))
    }

    fn upload(&mut self, image: &str, credentials: &Credentials) -> Result<()> {
        log::info!("Pushing image: {}", image);
        self.engine.push(image, credentials, &mut self.out)
    }

    fn remove(&mut self, image: &str) {
        if let Err(e) = self.engine.remove(image) {
            log::warn!("Failed to remove {}: {}", image, e);
        }
    }
}
