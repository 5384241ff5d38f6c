//! Readiness and liveness probes.
//!
//! The process moves through three phases: `starting` until the listener is
//! bound, `serving` while requests are accepted, and `draining` once a
//! shutdown signal arrives. Readiness passes only while serving; liveness
//! fails only once draining.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle phase reported by the probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Phase {
    /// The listener is not bound yet.
    Starting,
    /// Requests are accepted.
    Serving,
    /// A shutdown signal arrived; workers are finishing.
    Draining,
}

impl Phase {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Serving,
            _ => Self::Draining,
        }
    }
}

/// Probe response body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ProbeBody {
    /// Phase at the time of the probe.
    pub status: Phase,
}

/// Shared lifecycle phase of the process.
#[derive(Debug, Default)]
pub struct HealthState {
    phase: AtomicU8,
}

impl HealthState {
    /// Start in the `starting` phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `serving`. Has no effect once draining.
    pub fn mark_ready(&self) {
        let _already_draining = self.phase.compare_exchange(
            Phase::Starting as u8,
            Phase::Serving as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Enter `draining`; probes fail from here on.
    pub fn mark_draining(&self) {
        self.phase.store(Phase::Draining as u8, Ordering::Release);
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }
}

fn probe_response(phase: Phase, passing: bool) -> HttpResponse {
    let mut response = if passing {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ProbeBody { status: phase })
}

/// Readiness probe: 200 while serving.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Accepting requests", body = ProbeBody),
        (status = 503, description = "Starting or draining", body = ProbeBody)
    ),
    operation_id = "ready"
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let phase = state.phase();
    probe_response(phase, phase == Phase::Serving)
}

/// Liveness probe: 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is alive", body = ProbeBody),
        (status = 503, description = "Shutting down", body = ProbeBody)
    ),
    operation_id = "live"
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    let phase = state.phase();
    probe_response(phase, phase != Phase::Draining)
}
