//! Container runtime adapter over the Docker Engine API (`bollard`).

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, KillContainerOptions,
    ListContainersOptions, LogsOptions, RemoveContainerOptions, StartContainerOptions,
    StopContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::image::CreateImageOptions;
use bollard::models::{DeviceMapping, HostConfig, PortBinding, PortMap};
use bollard::volume::RemoveVolumeOptions;
use bollard::{API_DEFAULT_VERSION, Docker};
use futures_util::{StreamExt, TryStreamExt};
use guestbox_common::TargetConfigOptions;
use tracing::{debug, info};

use crate::application::ports::{ContainerRuntime, ProgressReporter, Removal};
use crate::domain::container::{ContainerInspection, ContainerSpec};
use crate::domain::port_plan::tcp_key;
use crate::infra::tunnel::SshTunnel;

/// Request timeout for runtime API calls, in seconds.
const CLIENT_TIMEOUT_SECS: u64 = 120;

/// Production `ContainerRuntime` backed by a Docker-compatible daemon.
pub struct BollardRuntime {
    docker: Docker,
    /// Held for as long as the client talks through it.
    _tunnel: Option<SshTunnel>,
}

impl BollardRuntime {
    /// Build a client for the target: `docker_host` when set, the remote
    /// socket forwarded over SSH for a remote hostname, else the local socket.
    ///
    /// Only the SSH forward touches the network here; an unreachable daemon
    /// surfaces on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the SSH forward fails or the endpoint cannot be
    /// turned into a client.
    pub async fn connect(options: &TargetConfigOptions) -> Result<Self> {
        if options.ssh_host().is_some() {
            let tunnel = SshTunnel::open(options).await?;
            let path = tunnel.socket_path().to_string_lossy().into_owned();
            let docker = socket_client(&path)?;
            return Ok(Self {
                docker,
                _tunnel: Some(tunnel),
            });
        }
        let docker = match options.docker_host.as_deref() {
            Some(host) if host.starts_with("unix://") => {
                socket_client(host.trim_start_matches("unix://"))?
            }
            Some(host) => Docker::connect_with_http(host, CLIENT_TIMEOUT_SECS, API_DEFAULT_VERSION)
                .with_context(|| format!("cannot connect to runtime at {host}"))?,
            None => socket_client(&options.sock_path)?,
        };
        Ok(Self {
            docker,
            _tunnel: None,
        })
    }
}

fn socket_client(path: &str) -> Result<Docker> {
    Docker::connect_with_socket(path, CLIENT_TIMEOUT_SECS, API_DEFAULT_VERSION)
        .with_context(|| format!("cannot connect to runtime socket {path}"))
}

fn is_status(error: &BollardError, codes: &[u16]) -> bool {
    matches!(
        error,
        BollardError::DockerResponseServerError { status_code, .. } if codes.contains(status_code)
    )
}

fn is_not_found(error: &BollardError) -> bool {
    is_status(error, &[404])
}

/// Runtime container config for a spec.
fn to_config(spec: &ContainerSpec) -> Config<String> {
    let exposed_ports = spec
        .ports
        .exposed_ports()
        .into_iter()
        .map(|guest| (tcp_key(guest), HashMap::new()))
        .collect();
    let bindings = spec.ports.bindings();
    let port_bindings: PortMap = bindings
        .iter()
        .map(|(guest, host)| {
            (
                tcp_key(*guest),
                Some(vec![PortBinding {
                    host_ip: Some("0.0.0.0".to_string()),
                    host_port: Some(host.to_string()),
                }]),
            )
        })
        .collect();
    let devices = spec
        .devices
        .iter()
        .map(|path| DeviceMapping {
            path_on_host: Some(path.clone()),
            path_in_container: Some(path.clone()),
            cgroup_permissions: Some("rwm".to_string()),
        })
        .collect();

    Config {
        hostname: Some(spec.hostname.clone()),
        user: Some(spec.user.clone()),
        image: Some(spec.image.clone()),
        entrypoint: Some(spec.entrypoint.clone()),
        env: Some(spec.env.clone()),
        labels: Some(spec.labels.clone().into_iter().collect()),
        exposed_ports: Some(exposed_ports),
        stop_timeout: Some(spec.stop_timeout_secs),
        attach_stdout: Some(true),
        attach_stderr: Some(true),
        host_config: Some(HostConfig {
            privileged: Some(spec.privileged),
            cap_add: Some(spec.cap_add.clone()),
            devices: Some(devices),
            extra_hosts: Some(spec.extra_hosts.clone()),
            port_bindings: Some(port_bindings),
            ..HostConfig::default()
        }),
        ..Config::default()
    }
}

/// Guest port → host port from a runtime port map. Unbound ports are skipped.
fn host_ports(ports: Option<&PortMap>) -> BTreeMap<u16, u16> {
    let Some(ports) = ports else {
        return BTreeMap::new();
    };
    ports
        .iter()
        .filter_map(|(key, bindings)| {
            let guest = key.split('/').next()?.parse().ok()?;
            let host = bindings
                .as_ref()?
                .iter()
                .find_map(|b| b.host_port.as_deref()?.parse().ok())?;
            Some((guest, host))
        })
        .collect()
}

/// Split `repo[:tag]` into repository and tag, defaulting to `latest`.
/// A colon inside a registry host (`host:5000/repo`) is not a tag separator.
fn split_image_reference(image: &str) -> (&str, &str) {
    match image.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo, tag),
        _ => (image, "latest"),
    }
}

impl ContainerRuntime for BollardRuntime {
    async fn ping(&self) -> Result<String> {
        let version = self
            .docker
            .version()
            .await
            .context("container runtime is not reachable")?;
        Ok(version.version.unwrap_or_else(|| "unknown".to_string()))
    }

    async fn create(&self, spec: &ContainerSpec) -> Result<String> {
        let options = CreateContainerOptions {
            name: spec.name.as_str(),
            platform: None,
        };
        let response = self
            .docker
            .create_container(Some(options), to_config(spec))
            .await
            .with_context(|| format!("creating container {}", spec.name))?;
        for warning in &response.warnings {
            debug!(container = spec.name.as_str(), warning = warning.as_str(), "runtime warning");
        }
        Ok(response.id)
    }

    async fn start(&self, container: &str) -> Result<()> {
        self.docker
            .start_container(container, None::<StartContainerOptions<String>>)
            .await
            .with_context(|| format!("starting container {container}"))
    }

    async fn stop(&self, container: &str, timeout_secs: i64) -> Result<()> {
        match self
            .docker
            .stop_container(container, Some(StopContainerOptions { t: timeout_secs }))
            .await
        {
            // 304: already stopped.
            Err(e) if is_status(&e, &[304]) => Ok(()),
            other => other.with_context(|| format!("stopping container {container}")),
        }
    }

    async fn kill(&self, container: &str) -> Result<()> {
        match self
            .docker
            .kill_container(container, Some(KillContainerOptions { signal: "SIGKILL" }))
            .await
        {
            // 409: not running.
            Err(e) if is_status(&e, &[304, 409]) => {
                debug!(container, "container was not running");
                Ok(())
            }
            other => other.with_context(|| format!("killing container {container}")),
        }
    }

    async fn inspect(&self, container: &str) -> Result<Option<ContainerInspection>> {
        let response = match self
            .docker
            .inspect_container(container, None::<InspectContainerOptions>)
            .await
        {
            Ok(response) => response,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("inspecting container {container}")),
        };

        let state = response.state.unwrap_or_default();
        Ok(Some(ContainerInspection {
            id: response.id.unwrap_or_default(),
            status: state.status.map(|s| s.to_string()).unwrap_or_default(),
            running: state.running.unwrap_or(false),
            exit_code: state.exit_code.unwrap_or(0),
            error: state.error.unwrap_or_default(),
            started_at: state.started_at,
            host_ports: host_ports(
                response
                    .network_settings
                    .as_ref()
                    .and_then(|n| n.ports.as_ref()),
            ),
        }))
    }

    async fn remove_container(&self, container: &str) -> Result<Removal> {
        let options = RemoveContainerOptions {
            force: true,
            v: true,
            ..RemoveContainerOptions::default()
        };
        match self.docker.remove_container(container, Some(options)).await {
            Ok(()) => Ok(Removal::Removed),
            Err(e) if is_not_found(&e) => Ok(Removal::AlreadyAbsent),
            Err(e) => Err(e).with_context(|| format!("removing container {container}")),
        }
    }

    async fn remove_volume(&self, volume: &str) -> Result<Removal> {
        match self
            .docker
            .remove_volume(volume, Some(RemoveVolumeOptions { force: true }))
            .await
        {
            Ok(()) => Ok(Removal::Removed),
            Err(e) if is_not_found(&e) => Ok(Removal::AlreadyAbsent),
            Err(e) => Err(e).with_context(|| format!("removing volume {volume}")),
        }
    }

    async fn find_by_labels(&self, filters: &[String]) -> Result<Vec<String>> {
        let options = ListContainersOptions {
            all: true,
            filters: HashMap::from([("label".to_string(), filters.to_vec())]),
            ..ListContainersOptions::default()
        };
        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .context("listing containers")?;
        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }

    async fn pull_image(&self, image: &str, reporter: &dyn ProgressReporter) -> Result<()> {
        let (from_image, tag) = split_image_reference(image);
        let options = CreateImageOptions {
            from_image,
            tag,
            ..CreateImageOptions::default()
        };
        let mut stream = std::pin::pin!(self.docker.create_image(Some(options), None, None));
        while let Some(info) = stream
            .try_next()
            .await
            .with_context(|| format!("pulling {image}"))?
        {
            let line = match (info.id, info.status, info.progress) {
                (Some(id), Some(status), Some(progress)) => format!("{id}: {status} {progress}"),
                (Some(id), Some(status), None) => format!("{id}: {status}"),
                (None, Some(status), _) => status,
                _ => continue,
            };
            reporter.log(&line);
        }
        info!(image, "image pulled");
        Ok(())
    }

    async fn logs(
        &self,
        container: &str,
        follow: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<()> {
        let options = LogsOptions::<String> {
            follow,
            stdout: true,
            stderr: true,
            ..LogsOptions::default()
        };
        let mut stream = std::pin::pin!(self.docker.logs(container, Some(options)));
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.with_context(|| format!("reading logs of {container}"))?;
            for line in chunk.to_string().lines() {
                reporter.log(line);
            }
        }
        Ok(())
    }
}
