use culler_accel::{Classifier, Device, Labels, ModelSource, OnnxAccelerator};
use culler_agent::{Agent, AgentConfig, Command, Telemetry};
use culler_base::{log, log_fatal};
use culler_com::{CommandServer, SenderServer};
use gate::{build_actuator, build_camera};

#[tokio::main]
async fn main() {
    culler_base::init_stdout_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {path}");
            match AgentConfig::load(&path) {
                Ok(config) => config,
                Err(e) => log_fatal!("cannot load config {path}: {e}"),
            }
        }
        None => {
            log::warn!("no config file given, using defaults");
            AgentConfig::default()
        }
    };

    log::info!("opening camera");
    let camera = match build_camera(&config) {
        Ok(camera) => camera,
        Err(e) => log_fatal!("cannot open camera: {e}"),
    };

    log::info!("loading model {}", config.model.path.display());
    let device = match config.model.cuda_device {
        Some(device_id) => Device::Cuda { device_id },
        None => Device::Cpu,
    };
    let accelerator = OnnxAccelerator::new(device);
    let mut classifier = match Classifier::load(
        &accelerator,
        ModelSource::File(config.model.path.clone()),
        (config.model.input_height, config.model.input_width),
    ) {
        Ok(classifier) => classifier,
        Err(e) => log_fatal!("cannot load model {}: {e}", config.model.path.display()),
    };
    if let Some(labels_path) = &config.model.labels {
        match Labels::from_file(labels_path) {
            Ok(labels) => classifier = classifier.with_labels(labels),
            Err(e) => log_fatal!("cannot load labels {}: {e}", labels_path.display()),
        }
    }

    let actuator = build_actuator(&config);

    log::info!("telemetry on {}", config.telemetry_addr);
    let telemetry: SenderServer<Telemetry> =
        match SenderServer::bind(config.telemetry_addr.as_str()).await {
            Ok(server) => server,
            Err(e) => log_fatal!("cannot bind telemetry on {}: {e}", config.telemetry_addr),
        };

    log::info!("commands on {}", config.command_addr);
    let commands: CommandServer<Command> =
        match CommandServer::bind(config.command_addr.as_str()).await {
            Ok(server) => server,
            Err(e) => log_fatal!("cannot bind commands on {}: {e}", config.command_addr),
        };

    let mut agent = Agent::new(
        camera,
        classifier,
        actuator,
        telemetry,
        commands,
        config.reject.clone(),
        config.camera.fps,
    );

    tokio::select! {
        result = agent.run() => {
            if let Err(e) = result {
                log_fatal!("agent stopped: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("shutting down after {} frames", agent.frames_seen());
        }
    }

    agent.publish_state().await;
}
