//! Ingress verbs
//!
//! TLS ingresses get a self-signed certificate generated with openssl into a
//! temporary directory and stored as `<name>-tls`.

use super::{show_output, CommandOutcome};
use crate::context::EngineContext;
use kdev_core::errors::{KdevError, Result};
use kdev_core::kube::apply_manifest;
use kdev_core::render::{render_ingress, render_tls_ingress, IngressSpec};
use kdev_core::runtime::{RuntimeCall, Tool};
use std::path::Path;

const CERT_DAYS: &str = "365";

/// # Errors
///
/// `RuntimeCallFailed` if the apply fails.
pub fn create(ctx: &EngineContext, spec: &IngressSpec) -> Result<CommandOutcome> {
    apply_manifest(ctx.runtime, &render_ingress(spec)?)?;
    ctx.reporter.success(&format!(
        "Ingress {} routes http://{}{} to {}:{}",
        spec.name, spec.host, spec.path, spec.service, spec.port
    ));
    Ok(CommandOutcome::Done)
}

pub fn certificate_call(host: &str, key: &Path, cert: &Path) -> RuntimeCall {
    RuntimeCall::new(
        Tool::Openssl,
        [
            "req".to_string(),
            "-x509".to_string(),
            "-nodes".to_string(),
            "-days".to_string(),
            CERT_DAYS.to_string(),
            "-newkey".to_string(),
            "rsa:2048".to_string(),
            "-keyout".to_string(),
            key.display().to_string(),
            "-out".to_string(),
            cert.display().to_string(),
            "-subj".to_string(),
            format!("/CN={}/O=kdev", host),
        ],
    )
}

pub fn tls_secret_call(spec: &IngressSpec, key: &Path, cert: &Path) -> RuntimeCall {
    RuntimeCall::kubectl([
        "create".to_string(),
        "secret".to_string(),
        "tls".to_string(),
        spec.tls_secret_name(),
        format!("--cert={}", cert.display()),
        format!("--key={}", key.display()),
        "-n".to_string(),
        spec.namespace.clone(),
    ])
}

/// An existing TLS secret is reused with a warning
///
/// # Errors
///
/// `Io` if the temp dir cannot be created, `RuntimeCallFailed` otherwise.
pub fn create_tls(ctx: &EngineContext, spec: &IngressSpec) -> Result<CommandOutcome> {
    let dir = tempfile::tempdir().map_err(|e| KdevError::io("create_cert_dir", e))?;
    let key = dir.path().join("tls.key");
    let cert = dir.path().join("tls.crt");

    ctx.reporter
        .info(&format!("Generating self-signed certificate for {}", spec.host));
    ctx.runtime.run(&certificate_call(&spec.host, &key, &cert))?;

    match ctx.runtime.run(&tls_secret_call(spec, &key, &cert)) {
        Ok(_) => {}
        Err(e) if e.is_already_exists() => ctx.reporter.warn(&format!(
            "Secret {} already exists, reusing it",
            spec.tls_secret_name()
        )),
        Err(e) => return Err(e),
    }

    apply_manifest(ctx.runtime, &render_tls_ingress(spec)?)?;
    ctx.reporter.success(&format!(
        "TLS ingress {} routes https://{}{} to {}:{}",
        spec.name, spec.host, spec.path, spec.service, spec.port
    ));
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if kubectl fails.
pub fn delete(ctx: &EngineContext, name: &str, namespace: &str) -> Result<CommandOutcome> {
    ctx.runtime
        .run(&RuntimeCall::kubectl(["delete", "ingress", name, "-n", namespace]))?;
    ctx.reporter.success(&format!("Ingress {} deleted", name));
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if kubectl fails.
pub fn list(ctx: &EngineContext, namespace: &str) -> Result<CommandOutcome> {
    let output = ctx
        .runtime
        .run(&RuntimeCall::kubectl(["get", "ingress", "-n", namespace]))?;
    show_output(ctx, &output);
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if kubectl fails.
pub fn describe(ctx: &EngineContext, name: &str, namespace: &str) -> Result<CommandOutcome> {
    let output = ctx
        .runtime
        .run(&RuntimeCall::kubectl(["describe", "ingress", name, "-n", namespace]))?;
    show_output(ctx, &output);
    Ok(CommandOutcome::Done)
}

/// Request `http://<cluster-ip><path>` with the given Host header
///
/// Non-2xx/3xx answers are warnings; the route exists but the backend
/// may not be ready.
///
/// # Errors
///
/// `RuntimeCallFailed` if the cluster IP cannot be determined or curl fails.
pub fn test(ctx: &EngineContext, host: &str, path: &str) -> Result<CommandOutcome> {
    let ip_call = RuntimeCall::minikube(["ip", "-p", ctx.profile()]);
    let ip = ctx.runtime.run(&ip_call)?.trim().to_string();
    if ip.is_empty() {
        return Err(ip_call.failed(None, "no cluster IP reported"));
    }

    let url = format!("http://{}{}", ip, path);
    let code = ctx.runtime.run(&RuntimeCall::new(
        Tool::Curl,
        [
            "-s".to_string(),
            "-o".to_string(),
            "/dev/null".to_string(),
            "-w".to_string(),
            "%{http_code}".to_string(),
            "-H".to_string(),
            format!("Host: {}", host),
            url.clone(),
        ],
    ))?;
    let code = code.trim();

    if code.starts_with('2') || code.starts_with('3') {
        ctx.reporter
            .success(&format!("{} (Host: {}) answered HTTP {}", url, host, code));
    } else {
        ctx.reporter
            .warn(&format!("{} (Host: {}) answered HTTP {}", url, host, code));
    }
    Ok(CommandOutcome::Done)
}
