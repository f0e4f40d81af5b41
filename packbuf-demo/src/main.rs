//! Packbuf precision-tier demo
//!
//! Simulates a transform wandering inside fixed world bounds, packs it every
//! step at four precision tiers, round-trips each snapshot through a
//! fingerprinted buffer the way a netcode layer would, and reports how much
//! error each tier trades for its byte size.
//!
//! ```bash
//! packbuf-demo --steps 600 --extent 50 --seed 7
//! RUST_LOG=debug packbuf-demo   # per-step logging
//! ```

use anyhow::Result;
use clap::Parser;
use packbuf::{FingerprintWidth, PackBuf};
use rand::{Rng, SeedableRng};

/// Terminal demo for packbuf precision tiers
#[derive(Parser)]
#[command(name = "packbuf-demo")]
#[command(about = "Round-trips a moving transform at several precision tiers")]
#[command(version)]
struct Cli {
    /// Number of simulation steps
    #[arg(long, default_value_t = 600)]
    steps: u32,

    /// Half-size of the world cube positions stay inside
    #[arg(long, default_value_t = 50.0)]
    extent: f32,

    /// Upper bound for the (always positive) scale channels
    #[arg(long, default_value_t = 4.0)]
    max_scale: f32,

    /// Seed for the simulated motion
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

/// One sampled transform, in packbuf's plain math types.
#[derive(Clone, Copy)]
struct TransformSample {
    position: packbuf::Vec3,
    rotation: packbuf::Quat,
    scale: packbuf::Vec3,
}

#[derive(Clone, Copy)]
struct WorldBounds {
    extents: [f32; 3],
    scale_ranges: [(f32, f32); 3],
}

/// A named pack/unpack call sequence. Sender and receiver must agree on the
/// sequence; that symmetry is the caller contract packbuf leaves unenforced.
struct Tier {
    name: &'static str,
    fingerprint: FingerprintWidth,
    pack: fn(&mut PackBuf, &TransformSample, &WorldBounds),
    unpack: fn(&mut PackBuf, &WorldBounds) -> TransformSample,
}

const TIERS: [Tier; 4] = [
    Tier {
        name: "full",
        fingerprint: FingerprintWidth::B32,
        pack: |buf, sample, _| {
            buf.pack_vec3(sample.position);
            buf.pack_quat(sample.rotation);
            buf.pack_vec3(sample.scale);
        },
        unpack: |buf, _| TransformSample {
            position: buf.unpack_vec3(),
            rotation: buf.unpack_quat(),
            scale: buf.unpack_vec3(),
        },
    },
    Tier {
        name: "balanced",
        fingerprint: FingerprintWidth::B32,
        pack: |buf, sample, bounds| {
            buf.pack_vec3(sample.position);
            buf.pack_quat_40(sample.rotation);
            buf.pack_vec3_48(sample.scale, bounds.scale_ranges);
        },
        unpack: |buf, bounds| TransformSample {
            position: buf.unpack_vec3(),
            rotation: buf.unpack_quat_40(),
            scale: buf.unpack_vec3_48(bounds.scale_ranges),
        },
    },
    Tier {
        name: "half",
        fingerprint: FingerprintWidth::B16,
        pack: |buf, sample, bounds| {
            buf.pack_vec3_48_extents(sample.position, bounds.extents);
            buf.pack_quat_64(sample.rotation);
            buf.pack_vec3_48(sample.scale, bounds.scale_ranges);
        },
        unpack: |buf, bounds| TransformSample {
            position: buf.unpack_vec3_48_extents(bounds.extents),
            rotation: buf.unpack_quat_64(),
            scale: buf.unpack_vec3_48(bounds.scale_ranges),
        },
    },
    Tier {
        name: "low",
        fingerprint: FingerprintWidth::B8,
        pack: |buf, sample, bounds| {
            buf.pack_vec3_24_extents(sample.position, bounds.extents);
            buf.pack_quat_32(sample.rotation);
            buf.pack_vec3_24(sample.scale, bounds.scale_ranges);
        },
        unpack: |buf, bounds| TransformSample {
            position: buf.unpack_vec3_24_extents(bounds.extents),
            rotation: buf.unpack_quat_32(),
            scale: buf.unpack_vec3_24(bounds.scale_ranges),
        },
    },
];

#[derive(Default)]
struct TierStats {
    bytes_per_snapshot: usize,
    max_position_error: f32,
    sum_position_error: f64,
    max_angle_error_deg: f32,
    max_scale_error: f32,
    fingerprint_failures: u32,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    anyhow::ensure!(cli.extent > 0.0, "--extent must be positive");
    anyhow::ensure!(cli.max_scale > 0.0, "--max-scale must be positive");

    let bounds = WorldBounds {
        extents: [cli.extent; 3],
        scale_ranges: [(0.0, cli.max_scale); 3],
    };

    tracing::info!(
        steps = cli.steps,
        extent = cli.extent,
        seed = cli.seed,
        "simulating transform snapshots"
    );

    let mut rng = rand_pcg::Pcg32::seed_from_u64(cli.seed);
    let mut stats: [TierStats; 4] = Default::default();

    let mut rotation = glam::Quat::IDENTITY;
    // Constant angular velocity axis, re-rolled per run.
    let tumble_axis = glam::Vec3::new(
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
    )
    .normalize_or(glam::Vec3::Y);

    for step in 0..cli.steps {
        let sample = next_sample(step, &cli, &mut rng, &mut rotation, tumble_axis);

        for (tier, stat) in TIERS.iter().zip(stats.iter_mut()) {
            let mut sender = PackBuf::with_fingerprint(64, tier.fingerprint);
            (tier.pack)(&mut sender, &sample, &bounds);
            stat.bytes_per_snapshot = sender.cursor() - sender.fingerprint_len();
            sender.generate_fingerprint();

            // "Transmit": the receiver sees only the raw bytes.
            let mut receiver = PackBuf::from_slice(sender.data(), true, tier.fingerprint);
            if !receiver.has_valid_fingerprint() {
                stat.fingerprint_failures += 1;
                continue;
            }
            receiver.seek_to_start();
            let decoded = (tier.unpack)(&mut receiver, &bounds);
            accumulate(stat, &sample, &decoded);
        }

        if step % 100 == 0 {
            tracing::debug!(step, "snapshot round-trip");
        }
    }

    print_report(&cli, &stats);
    Ok(())
}

/// Advances the simulated transform: a slow orbit with jitter, a constant
/// tumble, and a pulsing non-uniform scale.
fn next_sample(
    step: u32,
    cli: &Cli,
    rng: &mut rand_pcg::Pcg32,
    rotation: &mut glam::Quat,
    tumble_axis: glam::Vec3,
) -> TransformSample {
    let t = step as f32 * 0.02;
    let orbit = cli.extent * 0.8;
    let jitter = cli.extent * 0.01;
    let position = glam::Vec3::new(
        orbit * t.sin() + rng.random_range(-jitter..jitter),
        orbit * 0.25 * (t * 1.7).cos(),
        orbit * t.cos() + rng.random_range(-jitter..jitter),
    );

    *rotation = (*rotation * glam::Quat::from_axis_angle(tumble_axis, 0.03)).normalize();

    let pulse = 0.5 + 0.45 * (t * 0.8).sin();
    let scale = glam::Vec3::new(
        cli.max_scale * pulse,
        cli.max_scale * pulse * 0.5,
        cli.max_scale * pulse,
    );

    TransformSample {
        position: packbuf::Vec3::new(position.x, position.y, position.z),
        rotation: packbuf::Quat::new(rotation.x, rotation.y, rotation.z, rotation.w),
        scale: packbuf::Vec3::new(scale.x, scale.y, scale.z),
    }
}

fn accumulate(stat: &mut TierStats, sent: &TransformSample, decoded: &TransformSample) {
    let position_error = (decoded.position - sent.position).length();
    stat.max_position_error = stat.max_position_error.max(position_error);
    stat.sum_position_error += position_error as f64;

    let dot = packbuf::Quat::dot(sent.rotation, decoded.rotation)
        .abs()
        .min(1.0);
    let angle_deg = 2.0 * dot.acos().to_degrees();
    stat.max_angle_error_deg = stat.max_angle_error_deg.max(angle_deg);

    let scale_error = (decoded.scale - sent.scale).length();
    stat.max_scale_error = stat.max_scale_error.max(scale_error);
}

fn print_report(cli: &Cli, stats: &[TierStats; 4]) {
    println!();
    println!(
        "{:>10} {:>7} {:>12} {:>13} {:>12} {:>12} {:>6}",
        "tier", "bytes", "max pos err", "mean pos err", "max rot deg", "max scl err", "bad fp"
    );
    for (tier, stat) in TIERS.iter().zip(stats.iter()) {
        let mean = stat.sum_position_error / cli.steps as f64;
        println!(
            "{:>10} {:>7} {:>12.5} {:>13.5} {:>12.4} {:>12.5} {:>6}",
            tier.name,
            stat.bytes_per_snapshot,
            stat.max_position_error,
            mean,
            stat.max_angle_error_deg,
            stat.max_scale_error,
            stat.fingerprint_failures,
        );
    }
    println!();
}
