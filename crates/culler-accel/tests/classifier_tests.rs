use culler_accel::{Accelerator, AccelError, Classifier, Labels, ModelSource, Session, Verdict};
use culler_base::Tensor;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Accelerator whose sessions return a fixed score row and remember the
/// shape of the last input they saw.
struct FixedAccelerator {
    scores: Vec<f32>,
    seen_shapes: Arc<Mutex<Vec<Vec<usize>>>>,
}

impl FixedAccelerator {
    fn new(scores: Vec<f32>) -> Self {
        Self {
            scores,
            seen_shapes: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

struct FixedSession {
    scores: Vec<f32>,
    input_names: Vec<String>,
    output_names: Vec<String>,
    seen_shapes: Arc<Mutex<Vec<Vec<usize>>>>,
}

impl Accelerator for FixedAccelerator {
    fn name(&self) -> &str {
        "fixed"
    }

    fn load_model(&self, _model: ModelSource) -> Result<Box<dyn Session>, AccelError> {
        Ok(Box::new(FixedSession {
            scores: self.scores.clone(),
            input_names: vec!["images".to_string()],
            output_names: vec!["scores".to_string()],
            seen_shapes: self.seen_shapes.clone(),
        }))
    }
}

impl Session for FixedSession {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, AccelError> {
        assert_eq!(inputs.len(), 1);
        self.seen_shapes.lock().unwrap().push(inputs[0].1.shape.clone());

        let scores = Tensor::new(vec![1, self.scores.len()], self.scores.clone())
            .map_err(|e| AccelError::Shape(e.to_string()))?;
        Ok(HashMap::from([("scores".to_string(), scores)]))
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

fn rgb_frame(h: usize, w: usize) -> Tensor<u8> {
    Tensor::new(vec![h, w, 3], vec![100u8; h * w * 3]).unwrap()
}

#[tokio::test]
async fn classify_returns_argmax_verdict() {
    let accel = FixedAccelerator::new(vec![0.05, 0.92, 0.03]);
    let classifier =
        Classifier::load(&accel, ModelSource::Memory(Vec::new()), (32, 32)).unwrap();

    let verdict = classifier.classify(&rgb_frame(48, 64)).await.unwrap();
    assert_eq!(
        verdict,
        Verdict {
            class_id: 1,
            probability: 0.92,
            classes: 3
        }
    );
}

#[tokio::test]
async fn classify_resizes_to_model_input() {
    let accel = FixedAccelerator::new(vec![1.0, 0.0]);
    let classifier =
        Classifier::load(&accel, ModelSource::Memory(Vec::new()), (24, 24)).unwrap();

    // Any frame size in, the session must see [1, 3, 24, 24].
    classifier.classify(&rgb_frame(480, 640)).await.unwrap();
    classifier.classify(&rgb_frame(7, 9)).await.unwrap();

    let shapes = accel.seen_shapes.lock().unwrap();
    assert_eq!(*shapes, vec![vec![1, 3, 24, 24], vec![1, 3, 24, 24]]);
}

#[tokio::test]
async fn classify_rejects_non_rgb_frames() {
    let accel = FixedAccelerator::new(vec![1.0]);
    let classifier =
        Classifier::load(&accel, ModelSource::Memory(Vec::new()), (8, 8)).unwrap();

    let grey = Tensor::new(vec![8, 8, 1], vec![0u8; 64]).unwrap();
    assert!(matches!(
        classifier.classify(&grey).await,
        Err(AccelError::Shape(_))
    ));
}

#[test]
fn labels_resolve_verdict_classes() {
    let accel = FixedAccelerator::new(vec![0.2, 0.8]);
    let classifier = Classifier::load(&accel, ModelSource::Memory(Vec::new()), (8, 8))
        .unwrap()
        .with_labels(Labels::parse("ok\ndefect"));

    assert_eq!(classifier.label_of(1), Some("defect"));
    assert_eq!(classifier.label_of(9), None);
}
