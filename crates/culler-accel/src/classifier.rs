use crate::{Accelerator, AccelError, Labels, ModelSource, Session};
use culler_base::Tensor;
use std::sync::{Arc, Mutex};

/// Result of classifying one frame: the argmax class, its probability,
/// and how many classes the score row held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verdict {
    pub class_id: u32,
    pub probability: f32,
    pub classes: u32,
}

/// Single-image classifier on top of an accelerator [`Session`].
///
/// Handles the whole frame-to-verdict path: nearest-neighbor resize to the
/// model input size, HWC u8 to NCHW f32 in 0..1, the session run on a
/// blocking thread, and softmax/argmax on the output row.
pub struct Classifier {
    session: Arc<Mutex<Box<dyn Session>>>,
    input_name: String,
    output_name: String,
    input_hw: (usize, usize),
    labels: Labels,
}

impl Classifier {
    /// Load `model` on `accelerator` and bind the first input/output.
    pub fn load(
        accelerator: &dyn Accelerator,
        model: ModelSource,
        input_hw: (usize, usize),
    ) -> Result<Self, AccelError> {
        let session = accelerator.load_model(model)?;

        let input_name = session
            .input_names()
            .first()
            .cloned()
            .ok_or_else(|| AccelError::ModelLoad("model has no inputs".to_string()))?;
        let output_name = session
            .output_names()
            .first()
            .cloned()
            .ok_or_else(|| AccelError::ModelLoad("model has no outputs".to_string()))?;

        log::info!(
            "classifier on {}: input '{}' {}x{}, output '{}'",
            accelerator.name(),
            input_name,
            input_hw.1,
            input_hw.0,
            output_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
            input_hw,
            labels: Labels::default(),
        })
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn label_of(&self, class_id: u32) -> Option<&str> {
        self.labels.get(class_id)
    }

    /// Classify one HWC RGB8 frame.
    ///
    /// The session run happens on a blocking thread so the capture loop is
    /// not stalled by the executor.
    pub async fn classify(&self, frame: &Tensor<u8>) -> Result<Verdict, AccelError> {
        let input = preprocess(frame, self.input_hw)?;

        let session = Arc::clone(&self.session);
        let input_name = self.input_name.clone();

        let mut outputs = tokio::task::spawn_blocking(move || {
            let mut session = session.lock().unwrap_or_else(|e| e.into_inner());
            session.run(&[(input_name.as_str(), input)])
        })
        .await
        .map_err(|e| AccelError::Runtime(format!("inference task failed: {e}")))??;

        let scores = outputs.remove(&self.output_name).ok_or_else(|| {
            AccelError::Shape(format!("model produced no output '{}'", self.output_name))
        })?;

        postprocess(&scores)
    }
}

/// HWC RGB8 frame to NCHW `[1, 3, th, tw]` f32 in 0..1.
///
/// Nearest-neighbor resize; good enough for classification inputs, and
/// avoids pulling a resampling dependency into the hot loop.
pub fn preprocess(frame: &Tensor<u8>, (th, tw): (usize, usize)) -> Result<Tensor<f32>, AccelError> {
    if frame.shape.len() != 3 {
        return Err(AccelError::Shape(format!(
            "expected HWC frame, got shape {:?}",
            frame.shape
        )));
    }
    let (h, w, c) = (frame.shape[0], frame.shape[1], frame.shape[2]);
    if h == 0 || w == 0 {
        return Err(AccelError::Shape(format!("empty frame: {h}x{w}")));
    }
    if c != 3 {
        return Err(AccelError::Shape(format!("expected 3 channels, got {c}")));
    }
    if th == 0 || tw == 0 {
        return Err(AccelError::Shape(format!("bad model input size: {th}x{tw}")));
    }

    let mut data = vec![0.0f32; 3 * th * tw];
    for y in 0..th {
        let sy = y * h / th;
        for x in 0..tw {
            let sx = x * w / tw;
            let src = (sy * w + sx) * 3;
            for ch in 0..3 {
                data[ch * th * tw + y * tw + x] = frame.data[src + ch] as f32 / 255.0;
            }
        }
    }

    Tensor::new(vec![1, 3, th, tw], data).map_err(|e| AccelError::Shape(e.to_string()))
}

/// Score row to [`Verdict`].
///
/// Accepts `[n]` or `[1, n]` outputs. Raw logits (negative values, or a
/// row that does not sum to ~1) go through a max-subtracted softmax first.
pub fn postprocess(scores: &Tensor<f32>) -> Result<Verdict, AccelError> {
    let row: &[f32] = match scores.shape.as_slice() {
        [n] => &scores.data[..*n],
        [1, n] => &scores.data[..*n],
        other => {
            return Err(AccelError::Shape(format!(
                "expected [n] or [1, n] scores, got {other:?}"
            )));
        }
    };
    if row.is_empty() {
        return Err(AccelError::Shape("empty score row".to_string()));
    }

    let sum: f32 = row.iter().sum();
    let looks_like_probs = row.iter().all(|&v| v >= 0.0) && (sum - 1.0).abs() < 1e-3;

    let probs: Vec<f32> = if looks_like_probs {
        row.to_vec()
    } else {
        softmax(row)
    };

    let (class_id, probability) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| AccelError::Shape("empty score row".to_string()))?;

    Ok(Verdict {
        class_id: class_id as u32,
        probability,
        classes: row.len() as u32,
    })
}

fn softmax(row: &[f32]) -> Vec<f32> {
    // Subtract the max so exp() cannot overflow.
    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = row.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_shapes_and_scales() {
        // 2x2 RGB frame, all channels 255.
        let frame = Tensor::new(vec![2, 2, 3], vec![255u8; 12]).unwrap();
        let t = preprocess(&frame, (4, 4)).unwrap();
        assert_eq!(t.shape, vec![1, 3, 4, 4]);
        assert!(t.data.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn preprocess_nearest_picks_source_pixels() {
        // 1x2 frame: left pixel red, right pixel green.
        let frame = Tensor::new(vec![1, 2, 3], vec![255, 0, 0, 0, 255, 0]).unwrap();
        let t = preprocess(&frame, (1, 4)).unwrap();
        // R channel: first two columns from the left pixel, last two from the right.
        assert_eq!(&t.data[0..4], &[1.0, 1.0, 0.0, 0.0]);
        // G channel is the complement.
        assert_eq!(&t.data[4..8], &[0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn preprocess_rejects_bad_shapes() {
        let grey = Tensor::new(vec![2, 2, 1], vec![0u8; 4]).unwrap();
        assert!(matches!(
            preprocess(&grey, (4, 4)),
            Err(AccelError::Shape(_))
        ));

        let flat = Tensor::new(vec![12], vec![0u8; 12]).unwrap();
        assert!(matches!(
            preprocess(&flat, (4, 4)),
            Err(AccelError::Shape(_))
        ));
    }

    #[test]
    fn postprocess_takes_argmax_of_probabilities() {
        let scores = Tensor::new(vec![1, 3], vec![0.1, 0.7, 0.2]).unwrap();
        let verdict = postprocess(&scores).unwrap();
        assert_eq!(verdict.class_id, 1);
        assert!((verdict.probability - 0.7).abs() < 1e-6);
        assert_eq!(verdict.classes, 3);
    }

    #[test]
    fn postprocess_softmaxes_logits() {
        let scores = Tensor::new(vec![2], vec![0.0, 2.0]).unwrap();
        let verdict = postprocess(&scores).unwrap();
        assert_eq!(verdict.class_id, 1);
        // softmax([0, 2])[1] = e^2 / (1 + e^2)
        let expected = 2.0f32.exp() / (1.0 + 2.0f32.exp());
        assert!((verdict.probability - expected).abs() < 1e-5);
    }

    #[test]
    fn postprocess_survives_huge_logits() {
        let scores = Tensor::new(vec![2], vec![1000.0, 900.0]).unwrap();
        let verdict = postprocess(&scores).unwrap();
        assert_eq!(verdict.class_id, 0);
        assert!(verdict.probability.is_finite());
        assert!(verdict.probability > 0.99);
    }

    #[test]
    fn postprocess_rejects_matrix_output() {
        let scores = Tensor::new(vec![2, 3], vec![0.0; 6]).unwrap();
        assert!(matches!(postprocess(&scores), Err(AccelError::Shape(_))));
    }
}
