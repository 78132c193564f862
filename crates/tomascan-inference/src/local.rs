//! Locally loaded Candle classifier backend

use crate::backend::InferenceBackend;
use crate::preprocess;
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::ops::softmax;
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, Module, VarBuilder};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::path::PathBuf;
use tomascan_core::taxonomy::{self, RAW_CLASS_COUNT};
use tomascan_core::{Error, InferenceOutput, Result, ScoredLabel};
use tracing::info;

/// Configuration for the locally loaded classifier
#[derive(Debug, Clone)]
pub struct LocalModelConfig {
    /// Source of the model weights
    pub source: ModelSource,

    /// Square input edge length the model was trained on (224 or 256)
    pub input_size: u32,

    /// Device to run inference on
    pub device: DeviceType,
}

/// Source location for model weights
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// Load from local file system
    LocalPath(PathBuf),

    /// Download from Hugging Face Hub
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
        filename: String,
    },
}

/// Device type for inference
#[derive(Debug, Clone, Copy)]
pub enum DeviceType {
    /// CPU inference (always available)
    Cpu,
    /// CUDA GPU inference (if available)
    Cuda(usize),
}

/// Compact convolutional classifier over the raw plant-disease label space.
///
/// Three conv/pool blocks followed by two fully connected layers; expects
/// NCHW input and emits `RAW_CLASS_COUNT` logits.
struct LeafCnn {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    fc1: Linear,
    fc2: Linear,
}

impl LeafCnn {
    fn new(vb: VarBuilder, input_size: usize) -> candle_core::Result<Self> {
        let cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };
        let conv1 = conv2d(3, 16, 3, cfg, vb.pp("conv1"))?;
        let conv2 = conv2d(16, 32, 3, cfg, vb.pp("conv2"))?;
        let conv3 = conv2d(32, 64, 3, cfg, vb.pp("conv3"))?;

        // Each block halves the spatial dimensions.
        let spatial = input_size / 8;
        let fc1 = linear(64 * spatial * spatial, 128, vb.pp("fc1"))?;
        let fc2 = linear(128, RAW_CLASS_COUNT, vb.pp("fc2"))?;

        Ok(Self {
            conv1,
            conv2,
            conv3,
            fc1,
            fc2,
        })
    }

    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.conv1.forward(xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv2.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv3.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = xs.flatten_from(1)?;
        let xs = self.fc1.forward(&xs)?.relu()?;
        self.fc2.forward(&xs)
    }
}

/// Exclusively-owned, process-lifetime handle to the loaded classifier.
pub struct LocalClassifier {
    model: LeafCnn,
    device: Device,
    input_size: u32,
}

impl LocalClassifier {
    /// Load the classifier from configuration.
    ///
    /// A failure here is permanent for the process lifetime; the caller is
    /// expected to mark the disease service unavailable rather than retry.
    pub fn load(config: &LocalModelConfig) -> Result<Self> {
        let weights_path = resolve_model_path(&config.source)?;
        let device = create_device(config.device)?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
        }
        .map_err(|e| Error::inference(format!("failed to load model weights: {e}")))?;

        let classifier = Self::from_var_builder(vb, config.input_size, device)?;
        info!(path = %weights_path.display(), input_size = config.input_size, "local classifier loaded");
        Ok(classifier)
    }

    fn from_var_builder(vb: VarBuilder, input_size: u32, device: Device) -> Result<Self> {
        let model = LeafCnn::new(vb, input_size as usize)
            .map_err(|e| Error::inference(format!("failed to build model: {e}")))?;
        Ok(Self {
            model,
            device,
            input_size,
        })
    }

    /// Run the forward pass and return per-class probabilities for the
    /// single batch element.
    fn scores(&self, image_bytes: &[u8]) -> Result<Vec<f32>> {
        let input = preprocess::normalize_image(
            image_bytes,
            (self.input_size, self.input_size),
            &self.device,
        )?;

        // The normalizer produces NHWC; candle convolutions expect NCHW.
        let input = input
            .permute((0, 3, 1, 2))
            .map_err(|e| Error::inference(format!("failed to transpose input: {e}")))?;

        let logits = self
            .model
            .forward(&input)
            .map_err(|e| Error::inference(format!("forward pass failed: {e}")))?;

        softmax(&logits, D::Minus1)
            .and_then(|probs| probs.squeeze(0))
            .and_then(|probs| probs.to_vec1::<f32>())
            .map_err(|e| Error::inference(format!("failed to read probabilities: {e}")))
    }
}

#[async_trait]
impl InferenceBackend for LocalClassifier {
    async fn infer(&self, image_bytes: &[u8]) -> Result<InferenceOutput> {
        let scores = self.scores(image_bytes)?;
        let (label, confidence) = taxonomy::map_scores(&scores);
        match label {
            Some(label) => Ok(InferenceOutput::Scores(vec![ScoredLabel::new(
                label, confidence,
            )])),
            None => Err(Error::OutOfDomain { confidence }),
        }
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Resolve the weights path, downloading from the Hub when needed.
fn resolve_model_path(source: &ModelSource) -> Result<PathBuf> {
    match source {
        ModelSource::LocalPath(path) => {
            if !path.exists() {
                return Err(Error::config(format!("model file not found: {path:?}")));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace {
            repo_id,
            revision,
            filename,
        } => {
            let api = Api::new()
                .map_err(|e| Error::config(format!("failed to initialize HF API: {e}")))?;

            let repo = api.repo(Repo::with_revision(
                repo_id.clone(),
                RepoType::Model,
                revision.clone().unwrap_or_else(|| "main".to_string()),
            ));

            repo.get(filename)
                .map_err(|e| Error::config(format!("failed to download model weights: {e}")))
        }
    }
}

fn create_device(device_type: DeviceType) -> Result<Device> {
    match device_type {
        DeviceType::Cpu => Ok(Device::Cpu),
        DeviceType::Cuda(index) => Device::new_cuda(index)
            .map_err(|e| Error::inference(format!("failed to create CUDA device: {e}"))),
    }
}
