//! Container engine holding the local image store
//!
//! [Engine] is the set of image operations the relay needs,
//! and [DockerEngine] implements it with the [Docker Engine API](https://docs.docker.com/engine/api/).

use crate::{config::Credentials, error::*, ImageUri};
use bollard::{
    auth::DockerCredentials,
    image::{CreateImageOptions, PushImageOptions, RemoveImageOptions, TagImageOptions},
    models::{CreateImageInfo, PushImageInfo},
    Docker,
};
use futures_util::StreamExt;
use serde::Deserialize;
use std::io::Write;
use tokio::runtime::{Builder, Runtime};

/// Progress message in the stream of `POST /images/create`
///
/// ```text
/// {"status":"Downloading","progressDetail":{"current":1024,"total":2048},"id":"a3ed95caeb02"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullEvent {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub id: String,
    pub progress_detail: Option<ProgressDetail>,
    pub error: Option<String>,
    pub error_detail: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ProgressDetail {
    pub current: Option<i64>,
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

impl PullEvent {
    /// `(current, total)` if the message has `progressDetail`
    ///
    /// Layer messages like `Pull complete` carry an empty `progressDetail: {}`,
    /// which is read as `(0, 0)`.
    pub fn progress(&self) -> Option<(i64, i64)> {
        self.progress_detail
            .map(|p| (p.current.unwrap_or(0), p.total.unwrap_or(0)))
    }

    /// Error reported by the daemon, preferring `errorDetail.message`
    pub fn error_message(&self) -> Option<String> {
        let detail = self
            .error_detail
            .as_ref()
            .map(|detail| detail.message.clone())
            .filter(|message| !message.is_empty());
        match (detail, &self.error) {
            (Some(message), _) => Some(message),
            (None, Some(error)) if !error.is_empty() => Some(error.clone()),
            _ => None,
        }
    }
}

impl From<CreateImageInfo> for PullEvent {
    fn from(info: CreateImageInfo) -> Self {
        PullEvent {
            status: info.status.unwrap_or_default(),
            id: info.id.unwrap_or_default(),
            progress_detail: info.progress_detail.map(|p| ProgressDetail {
                current: p.current,
                total: p.total,
            }),
            error: info.error,
            error_detail: info.error_detail.map(|e| ErrorDetail {
                message: e.message.unwrap_or_default(),
            }),
        }
    }
}

/// Image operations of a container engine
///
/// Images are named by references like `gcr.io/google_containers/pause:3.1`.
pub trait Engine {
    /// Pull image from its registry, passing every progress message to `on_event`
    fn pull(
        &mut self,
        image: &str,
        on_event: &mut dyn FnMut(PullEvent) -> Result<()>,
    ) -> Result<()>;

    /// Add `target` as a new name of the local image `source`
    fn tag(&mut self, source: &str, target: &str) -> Result<()>;

    /// Push the local image to the registry in its name, copying the output to `out`
    fn push(&mut self, image: &str, credentials: &Credentials, out: &mut dyn Write)
        -> Result<()>;

    /// Remove the name from the local store
    fn remove(&mut self, image: &str) -> Result<()>;
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn pull(
        &mut self,
        image: &str,
        on_event: &mut dyn FnMut(PullEvent) -> Result<()>,
    ) -> Result<()> {
        (**self).pull(image, on_event)
    }

    fn tag(&mut self, source: &str, target: &str) -> Result<()> {
        (**self).tag(source, target)
    }

    fn push(&mut self, image: &str, credentials: &Credentials, out: &mut dyn Write)
        -> Result<()> {
        (**self).push(image, credentials, out)
    }

    fn remove(&mut self, image: &str) -> Result<()> {
        (**self).remove(image)
    }
}

/// Copy a message of the push stream as a JSON line, returning its error if any
///
/// Only the fields bollard decodes survive: `status`, `progress`, `progressDetail`
/// and `error`. The layer `id` and the final `aux` (tag, digest, size) are not
/// part of [PushImageInfo] and are lost.
pub fn write_push_info(out: &mut dyn Write, info: &PushImageInfo) -> Result<Option<String>> {
    serde_json::to_writer(&mut *out, info)?;
    writeln!(out)?;
    Ok(info.error.clone())
}

/// [Engine] backed by the Docker daemon
///
/// The daemon is found in the same way as the `docker` CLI, i.e. `DOCKER_HOST`
/// or the local socket. Calls block on a current-thread runtime owned by the handle.
pub struct DockerEngine {
    runtime: Runtime,
    docker: Docker,
}

impl DockerEngine {
    pub fn connect() -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let docker = {
            let _guard = runtime.enter();
            Docker::connect_with_local_defaults()?
        };
        let docker = runtime.block_on(docker.negotiate_version())?;
        log::debug!("Connected to Docker daemon");
        Ok(DockerEngine { runtime, docker })
    }
}

impl Engine for DockerEngine {
    fn pull(
        &mut self,
        image: &str,
        on_event: &mut dyn FnMut(PullEvent) -> Result<()>,
    ) -> Result<()> {
        let (repository, tag) = ImageUri::parse(image).split_tag();
        let options = CreateImageOptions {
            from_image: repository,
            tag,
            ..Default::default()
        };
        let docker = &self.docker;
        self.runtime.block_on(async {
            let stream = docker.create_image(Some(options), None, None);
            futures_util::pin_mut!(stream);
            while let Some(info) = stream.next().await {
                on_event(PullEvent::from(info?))?;
            }
            Ok::<_, Error>(())
        })
    }

    fn tag(&mut self, source: &str, target: &str) -> Result<()> {
        let (repo, tag) = ImageUri::parse(target).split_tag();
        let options = TagImageOptions { repo, tag };
        self.runtime
            .block_on(self.docker.tag_image(source, Some(options)))?;
        Ok(())
    }

    fn push(
        &mut self,
        image: &str,
        credentials: &Credentials,
        out: &mut dyn Write,
    ) -> Result<()> {
        let (repository, tag) = ImageUri::parse(image).split_tag();
        let auth = DockerCredentials {
            username: Some(credentials.username.clone()),
            password: Some(credentials.password.clone()),
            ..Default::default()
        };
        let docker = &self.docker;
        let mut failure = None;
        self.runtime.block_on(async {
            let stream = docker.push_image(repository, Some(PushImageOptions { tag }), Some(auth));
            futures_util::pin_mut!(stream);
            while let Some(info) = stream.next().await {
                if let Some(error) = write_push_info(&mut *out, &info?)? {
                    failure.get_or_insert(error);
                }
            }
            Ok::<_, Error>(())
        })?;
        out.flush()?;
        match failure {
            Some(error) => Err(Error::PushFailed(error)),
            None => Ok(()),
        }
    }

    fn remove(&mut self, image: &str) -> Result<()> {
        let removed = self.runtime.block_on(self.docker.remove_image(
            image,
            None::<RemoveImageOptions>,
            None,
        ))?;
        for item in removed {
            if let Some(untagged) = item.untagged {
                log::debug!("Untagged: {}", untagged);
            }
        }
        Ok(())
    }
}
