use crate::{Actuator, AgentError, Command, RejectRule, Telemetry};
use culler_accel::{AccelError, Classifier};
use culler_camera::Camera;
use culler_com::{CommandServer, SenderServer};
use std::time::Duration;
use tokio::time::Instant;

/// Pause after a failed capture or classification so a persistently
/// broken source cannot spin the loop at full CPU.
const ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// The host control loop: capture, classify, decide, actuate, publish.
pub struct Agent<C: Camera, A: Actuator> {
    camera: C,
    classifier: Classifier,
    actuator: A,
    telemetry: SenderServer<Telemetry>,
    commands: CommandServer<Command>,
    rule: RejectRule,
    frame_interval: Duration,
    paused: bool,
    seq: u64,
    last_fired: Option<Instant>,
}

impl<C: Camera, A: Actuator> Agent<C, A> {
    pub fn new(
        camera: C,
        classifier: Classifier,
        actuator: A,
        telemetry: SenderServer<Telemetry>,
        commands: CommandServer<Command>,
        rule: RejectRule,
        fps: u32,
    ) -> Self {
        Self {
            camera,
            classifier,
            actuator,
            telemetry,
            commands,
            rule,
            frame_interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            paused: false,
            seq: 0,
            last_fired: None,
        }
    }

    /// Drive the loop until the future is dropped (e.g. by a Ctrl-C select
    /// in the product binary). Per-frame failures are logged, published as
    /// [`Telemetry::Fault`], and skipped; they never end the loop.
    pub async fn run(&mut self) -> Result<(), AgentError> {
        log::info!(
            "agent running: reject class {} above {:.2}, cooldown {} ms",
            self.rule.class_id,
            self.rule.min_probability,
            self.rule.cooldown_ms
        );

        loop {
            self.step().await;
        }
    }

    /// One loop iteration. Public so tests can drive the loop frame by frame.
    pub async fn step(&mut self) {
        while let Some(command) = self.commands.try_recv() {
            self.apply_command(command).await;
        }

        if self.paused {
            tokio::time::sleep(self.frame_interval).await;
            return;
        }

        let frame = match self.camera.recv().await {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("frame capture failed: {e}");
                self.publish_fault(format!("capture: {e}")).await;
                tokio::time::sleep(ERROR_BACKOFF).await;
                return;
            }
        };

        let verdict = match self.classifier.classify(&frame).await {
            Ok(verdict) => verdict,
            Err(e) => {
                log::warn!("classification failed: {e}");
                self.publish_fault(format!("classify: {e}")).await;
                tokio::time::sleep(ERROR_BACKOFF).await;
                return;
            }
        };

        if self.rule.class_id >= verdict.classes {
            let e = AccelError::Shape(format!(
                "reject class {} out of range for {}-class model",
                self.rule.class_id, verdict.classes
            ));
            log::warn!("{e}");
            self.publish_fault(format!("decision: {e}")).await;
            tokio::time::sleep(ERROR_BACKOFF).await;
            return;
        }

        let mut rejected = false;
        if self.rule.matches(&verdict) && self.cooldown_elapsed() {
            match self.actuator.fire().await {
                Ok(()) => {
                    rejected = true;
                    self.last_fired = Some(Instant::now());
                    let label = self
                        .classifier
                        .label_of(verdict.class_id)
                        .unwrap_or("unlabeled");
                    log::info!(
                        "rejected frame {}: class {} ({label}) p={:.3}",
                        self.seq,
                        verdict.class_id,
                        verdict.probability
                    );
                }
                Err(e) => {
                    log::error!("actuator failed: {e}");
                    self.publish_fault(format!("actuator: {e}")).await;
                }
            }
        }

        let message = Telemetry::Frame {
            seq: self.seq,
            class_id: verdict.class_id,
            probability: verdict.probability,
            rejected,
        };
        self.seq += 1;

        if let Err(e) = self.telemetry.send(&message).await {
            log::warn!("telemetry publish failed: {e}");
        }
    }

    fn cooldown_elapsed(&self) -> bool {
        match self.last_fired {
            None => true,
            Some(at) => at.elapsed() >= Duration::from_millis(self.rule.cooldown_ms),
        }
    }

    async fn apply_command(&mut self, command: Command) {
        match command {
            Command::Pause => {
                log::info!("paused by operator");
                self.paused = true;
            }
            Command::Resume => {
                log::info!("resumed by operator");
                self.paused = false;
            }
            Command::SetMinProbability(p) => {
                let clamped = p.clamp(0.0, 1.0);
                log::info!("reject threshold set to {clamped:.2}");
                self.rule.min_probability = clamped;
            }
            Command::QueryState => {}
        }
        self.publish_state().await;
    }

    /// Broadcast the current state; also called once on shutdown.
    pub async fn publish_state(&self) {
        let message = Telemetry::State {
            paused: self.paused,
            min_probability: self.rule.min_probability,
        };
        if let Err(e) = self.telemetry.send(&message).await {
            log::warn!("state publish failed: {e}");
        }
    }

    async fn publish_fault(&self, message: String) {
        if let Err(e) = self.telemetry.send(&Telemetry::Fault { message }).await {
            log::warn!("fault publish failed: {e}");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frames_seen(&self) -> u64 {
        self.seq
    }
}
