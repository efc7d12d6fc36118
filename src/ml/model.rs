// ============================================================
// Layer 5 — Variational Autoencoder (Burn)
// ============================================================
// x ──► Encoder ──► (mu, logvar) ──► sample ──► z ──► Decoder ──► x_hat
//
//   Encoder : Linear(1→16) → ReLU → { Linear(16→2) = mu, Linear(16→2) = logvar }
//   sample  : z = mu + exp(0.5·logvar) · ε,   ε ~ N(0, I)
//   Decoder : Linear(2→16) → ReLU → Linear(16→1)   (x_hat is a logit)
//
// Loss per sample:
//   KL  = -0.5 · Σ (1 + logvar − mu² − exp(logvar))
//   BCE = Σ sigmoid_cross_entropy(logits = x_hat, targets = x)
// Objective = mean over the batch of (KL + BCE).
//
// Every piece is a plain function over tensors; nothing is built
// ahead of time, the forward pass runs eagerly.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::{activation::relu, Distribution},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct VaeConfig {
    #[config(default = 1)]
    pub input_dim:      usize,
    #[config(default = 16)]
    pub encoder_hidden: usize,
    #[config(default = 16)]
    pub decoder_hidden: usize,
    #[config(default = 2)]
    pub latent_dim:     usize,
}

impl VaeConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Vae<B> {
        Vae {
            encoder: self.init_encoder(device),
            decoder: self.init_decoder(device),
        }
    }

    pub fn init_encoder<B: Backend>(&self, device: &B::Device) -> Encoder<B> {
        Encoder {
            hidden:      LinearConfig::new(self.input_dim, self.encoder_hidden).init(device),
            mu_head:     LinearConfig::new(self.encoder_hidden, self.latent_dim).init(device),
            logvar_head: LinearConfig::new(self.encoder_hidden, self.latent_dim).init(device),
        }
    }

    pub fn init_decoder<B: Backend>(&self, device: &B::Device) -> Decoder<B> {
        Decoder {
            hidden: LinearConfig::new(self.latent_dim, self.decoder_hidden).init(device),
            output: LinearConfig::new(self.decoder_hidden, self.input_dim).init(device),
        }
    }
}

// ─── Encoder ──────────────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub hidden:      Linear<B>,
    pub mu_head:     Linear<B>,
    pub logvar_head: Linear<B>,
}

/// Parameters of the diagonal Gaussian q(z | x), both [batch, latent_dim].
#[derive(Debug, Clone)]
pub struct LatentParams<B: Backend> {
    pub mu:     Tensor<B, 2>,
    pub logvar: Tensor<B, 2>,
}

impl<B: Backend> Encoder<B> {
    /// x: [batch, input_dim] → (mu, logvar). Deterministic for fixed weights.
    pub fn forward(&self, x: Tensor<B, 2>) -> LatentParams<B> {
        let h = relu(self.hidden.forward(x));
        LatentParams {
            mu:     self.mu_head.forward(h.clone()),
            logvar: self.logvar_head.forward(h),
        }
    }
}

// ─── Sampler ──────────────────────────────────────────────────────────────────

/// Reparameterised draw: a fresh ε is taken on every call.
pub fn sample<B: Backend>(mu: Tensor<B, 2>, logvar: Tensor<B, 2>) -> Tensor<B, 2> {
    let epsilon = Tensor::random(logvar.shape(), Distribution::Normal(0.0, 1.0), &logvar.device());
    let std = logvar.mul_scalar(0.5).exp();
    mu + std * epsilon
}

// ─── Decoder ──────────────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub hidden: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> Decoder<B> {
    /// z: [batch, latent_dim] → x_hat logits: [batch, input_dim]
    pub fn forward(&self, z: Tensor<B, 2>) -> Tensor<B, 2> {
        self.output.forward(relu(self.hidden.forward(z)))
    }
}

// ─── Losses ───────────────────────────────────────────────────────────────────

/// Closed-form KL(q(z|x) ‖ N(0, I)) per sample → [batch]
pub fn kl_divergence<B: Backend>(mu: Tensor<B, 2>, logvar: Tensor<B, 2>) -> Tensor<B, 1> {
    let [batch, _] = mu.dims();
    let inner = logvar.clone().add_scalar(1.0) - mu.clone() * mu - logvar.exp();
    inner.sum_dim(1).mul_scalar(-0.5).reshape([batch])
}

/// Sigmoid cross-entropy with `logits` against `targets`, summed per sample → [batch]
///
/// Uses max(l, 0) − l·x + ln(1 + e^{−|l|}) so large logits never overflow.
pub fn reconstruction_loss<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    let [batch, _] = logits.dims();
    let log_term = logits.clone().abs().neg().exp().add_scalar(1.0).log();
    let bce = logits.clone().clamp_min(0.0) - logits * targets + log_term;
    bce.sum_dim(1).reshape([batch])
}

// ─── Full model ───────────────────────────────────────────────────────────────

/// Encoder and decoder are separate sub-modules so they can be
/// checkpointed (and restored) independently.
#[derive(Module, Debug)]
pub struct Vae<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
}

pub struct VaeLoss<B: Backend> {
    /// Training objective, mean of (KL + reconstruction): shape [1]
    pub loss:           Tensor<B, 1>,
    /// Batch mean of the KL term, for telemetry
    pub kl:             Tensor<B, 1>,
    /// Batch mean of the reconstruction term, for telemetry
    pub reconstruction: Tensor<B, 1>,
}

impl<B: Backend> Vae<B> {
    /// Full stochastic pass: returns the reconstruction logits.
    #[cfg(test)]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let latent = self.encoder.forward(x);
        self.decoder.forward(sample(latent.mu, latent.logvar))
    }

    pub fn forward_loss(&self, x: Tensor<B, 2>) -> VaeLoss<B> {
        let latent = self.encoder.forward(x.clone());
        let z      = sample(latent.mu.clone(), latent.logvar.clone());
        let x_hat  = self.decoder.forward(z);

        let kl  = kl_divergence(latent.mu, latent.logvar);
        let rec = reconstruction_loss(x_hat, x);

        VaeLoss {
            loss:           (kl.clone() + rec.clone()).mean(),
            kl:             kl.mean(),
            reconstruction: rec.mean(),
        }
    }
}
