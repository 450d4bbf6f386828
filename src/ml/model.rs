use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig, ConvTranspose2d, ConvTranspose2dConfig},
        BatchNorm, BatchNormConfig,
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        PaddingConfig2d,
    },
    prelude::*,
    tensor::{activation::sigmoid, Distribution},
};

use crate::domain::image_example::IMAGE_SIDE;

/// Keeps the log() calls in both losses away from zero.
const COST_EPSILON: f64 = 1e-8;

/// Channel count after the last encoder convolution.
const CONV_CHANNELS: usize = 128;
/// Spatial side length after the last encoder convolution (valid 5x5 on 7x7).
const CONV_SIDE: usize = 3;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct VaeConfig {
    pub hidden_size: usize,
    pub dropout:     f64,
}

impl VaeConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Vae<B> {
        Vae {
            encoder:     self.build_encoder(device),
            decoder:     self.build_decoder(device),
            hidden_size: self.hidden_size,
        }
    }

    // 28x28x1 → 14x14x32 → 7x7x64 → 3x3x128 → flatten → 2*hidden
    fn build_encoder<B: Backend>(&self, device: &B::Device) -> Encoder<B> {
        let conv1 = Conv2dConfig::new([1, 32], [5, 5])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(2, 2))
            .init(device);
        let conv2 = Conv2dConfig::new([32, 64], [5, 5])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(2, 2))
            .init(device);
        // Valid padding: 7x7 shrinks to 3x3
        let conv3 = Conv2dConfig::new([64, CONV_CHANNELS], [5, 5]).init(device);

        let norm1 = BatchNormConfig::new(32).init(device);
        let norm2 = BatchNormConfig::new(64).init(device);
        let norm3 = BatchNormConfig::new(CONV_CHANNELS).init(device);

        let dropout = DropoutConfig::new(self.dropout).init();

        // Projects to mean ‖ log-variance, no activation
        let moments = LinearConfig::new(
            CONV_CHANNELS * CONV_SIDE * CONV_SIDE,
            self.hidden_size * 2,
        )
        .init(device);

        Encoder { conv1, norm1, conv2, norm2, conv3, norm3, dropout, moments }
    }

    // [hidden]x1x1 → 3x3x128 → 7x7x64 → 14x14x32 → 28x28x1 → flatten
    fn build_decoder<B: Backend>(&self, device: &B::Device) -> Decoder<B> {
        // Valid transposed convs grow 1→3 and 3→7
        let deconv1 =
            ConvTranspose2dConfig::new([self.hidden_size, CONV_CHANNELS], [3, 3])
                .init(device);
        let deconv2 = ConvTranspose2dConfig::new([CONV_CHANNELS, 64], [5, 5])
            .init(device);
        // Strided transposed convs double the side: 7→14 and 14→28
        let deconv3 = ConvTranspose2dConfig::new([64, 32], [5, 5])
            .with_stride([2, 2])
            .with_padding([2, 2])
            .with_padding_out([1, 1])
            .init(device);
        let deconv4 = ConvTranspose2dConfig::new([32, 1], [5, 5])
            .with_stride([2, 2])
            .with_padding([2, 2])
            .with_padding_out([1, 1])
            .init(device);

        let norm1 = BatchNormConfig::new(CONV_CHANNELS).init(device);
        let norm2 = BatchNormConfig::new(64).init(device);
        let norm3 = BatchNormConfig::new(32).init(device);

        Decoder { deconv1, norm1, deconv2, norm2, deconv3, norm3, deconv4 }
    }
}

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub conv1:   Conv2d<B>,
    pub norm1:   BatchNorm<B, 2>,
    pub conv2:   Conv2d<B>,
    pub norm2:   BatchNorm<B, 2>,
    pub conv3:   Conv2d<B>,
    pub norm3:   BatchNorm<B, 2>,
    pub dropout: Dropout,
    pub moments: Linear<B>,
}

impl<B: Backend> Encoder<B> {
    /// images: [batch, 784] → moments: [batch, 2 * hidden]
    /// The first half of each row is the latent mean, the second
    /// half the latent log-variance.
    pub fn forward(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch_size, _] = images.dims();

        let x = images.reshape([batch_size, 1, IMAGE_SIDE, IMAGE_SIDE]);
        let x = elu(self.norm1.forward(self.conv1.forward(x)));
        let x = elu(self.norm2.forward(self.conv2.forward(x)));
        let x = elu(self.norm3.forward(self.conv3.forward(x)));
        let x = self.dropout.forward(x);

        // [batch, 128, 3, 3] → [batch, 1152]
        let x = x.flatten::<2>(1, 3);
        self.moments.forward(x)
    }
}

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub deconv1: ConvTranspose2d<B>,
    pub norm1:   BatchNorm<B, 2>,
    pub deconv2: ConvTranspose2d<B>,
    pub norm2:   BatchNorm<B, 2>,
    pub deconv3: ConvTranspose2d<B>,
    pub norm3:   BatchNorm<B, 2>,
    pub deconv4: ConvTranspose2d<B>,
}

impl<B: Backend> Decoder<B> {
    /// latents: [batch, hidden] → images: [batch, 784] in [0, 1]
    pub fn forward(&self, latents: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch_size, hidden] = latents.dims();

        // Treat the latent vector as a 1x1 feature map per channel
        let x = latents.reshape([batch_size, hidden, 1, 1]);
        let x = elu(self.norm1.forward(self.deconv1.forward(x)));
        let x = elu(self.norm2.forward(self.deconv2.forward(x)));
        let x = elu(self.norm3.forward(self.deconv3.forward(x)));

        // Sigmoid keeps the output in intensity space — required
        // by the cross-entropy reconstruction cost
        let x = sigmoid(self.deconv4.forward(x));

        x.flatten::<2>(1, 3)
    }
}

#[derive(Module, Debug)]
pub struct Vae<B: Backend> {
    pub encoder:     Encoder<B>,
    pub decoder:     Decoder<B>,
    pub hidden_size: usize,
}

pub struct VaeOutput<B: Backend> {
    /// Decoded images — shape: [batch, 784]
    pub reconstruction: Tensor<B, 2>,
    /// Latent mean — shape: [batch, hidden]
    pub mean: Tensor<B, 2>,
    /// Latent standard deviation — shape: [batch, hidden]
    pub stddev: Tensor<B, 2>,
}

impl<B: Backend> Vae<B> {
    /// Encode, sample a latent with the reparameterization trick,
    /// and decode back to image space.
    ///
    /// z = mean + stddev * epsilon with epsilon ~ N(0, 1) keeps the
    /// sampling step differentiable: gradients flow through mean and
    /// stddev while the randomness stays in the external noise.
    pub fn forward(&self, images: Tensor<B, 2>) -> VaeOutput<B> {
        let moments = self.encoder.forward(images);
        let [batch_size, two_hidden] = moments.dims();
        let hidden = two_hidden / 2;

        let mean = moments.clone().slice([0..batch_size, 0..hidden]);
        // stddev = sqrt(exp(logvar))
        let stddev = moments
            .slice([0..batch_size, hidden..two_hidden])
            .exp()
            .sqrt();

        let epsilon = Tensor::random(
            [batch_size, hidden],
            Distribution::Normal(0.0, 1.0),
            &mean.device(),
        );

        let z = mean.clone() + epsilon * stddev.clone();
        let reconstruction = self.decoder.forward(z);

        VaeOutput { reconstruction, mean, stddev }
    }

    /// Forward pass plus the full ELBO-style objective:
    /// latent cost + reconstruction cost, summed over the batch.
    ///
    /// Works on any backend so the same code serves the training
    /// loop (autodiff) and the validation pass (inner backend).
    pub fn forward_loss(&self, images: Tensor<B, 2>) -> (Tensor<B, 1>, VaeOutput<B>) {
        let output = self.forward(images.clone());
        let loss = latent_cost(output.mean.clone(), output.stddev.clone())
            + reconstruction_cost(output.reconstruction.clone(), images);
        (loss, output)
    }

    /// Decode `batch_size` latent vectors drawn from the prior N(0, 1).
    pub fn sample(&self, batch_size: usize, device: &B::Device) -> Tensor<B, 2> {
        let noise = Tensor::random(
            [batch_size, self.hidden_size],
            Distribution::Normal(0.0, 1.0),
            device,
        );
        self.decoder.forward(noise)
    }
}

/// Exponential linear unit.
///
/// Not a built-in at this burn version, but exactly expressible with
/// tensor ops: elu(x) = x for x > 0, exp(x) - 1 otherwise.
/// clamp_min zeroes the negative branch, clamp_max pins the positive
/// branch at exp(0) - 1 = 0, so the two halves sum to ELU.
pub fn elu<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    x.clone().clamp_min(0.0) + x.clamp_max(0.0).exp() - 1.0
}

/// Latent cost — the closed-form KL divergence between the encoded
/// Gaussian and the unit-Gaussian prior, summed over the batch:
///
///   sum( 0.5 * (mean² + stddev² - 2 ln(stddev + eps) - 1) )
pub fn latent_cost<B: Backend>(
    mean:   Tensor<B, 2>,
    stddev: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let pointwise = (mean.powf_scalar(2.0) + stddev.clone().powf_scalar(2.0)
        - (stddev + COST_EPSILON).log() * 2.0
        - 1.0)
        * 0.5;
    pointwise.sum()
}

/// Reconstruction cost — binary cross entropy between decoded and
/// target intensities, summed over every pixel in the batch:
///
///   sum( -t ln(o + eps) - (1 - t) ln(1 - o + eps) )
pub fn reconstruction_cost<B: Backend>(
    output: Tensor<B, 2>,
    target: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let pointwise = -(target.clone() * (output.clone() + COST_EPSILON).log())
        - (-target + 1.0) * (-output + 1.0 + COST_EPSILON).log();
    pointwise.sum()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image_example::FLAT_SIZE;

    #[test]
    fn test_config_holds_hyperparameters() {
        let config = VaeConfig::new(10, 0.1);
        assert_eq!(config.hidden_size, 10);
        assert!((config.dropout - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_encoder_output_side_matches_flat_size() {
        // 28 → 14 → 7 (stride-2 same convs), then 7 → 3 (valid 5x5)
        let after_stride = IMAGE_SIDE / 2 / 2;
        assert_eq!(after_stride - 5 + 1, CONV_SIDE);
        assert_eq!(IMAGE_SIDE * IMAGE_SIDE, FLAT_SIZE);
    }
}
