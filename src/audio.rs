use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{anyhow, Context};
use chip8vm::timer::TIMER_DEC_PER_SECOND;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

const TONE_HZ: f32 = 440.0;

/// A 440Hz tone on the default output device. Every `beep` keeps it
/// sounding for two more timer ticks' worth of samples.
pub struct Sound {
    remaining: Arc<AtomicUsize>,
    samples_per_tick: usize,
    // dropping the stream stops playback
    _stream: cpal::Stream,
}

impl Sound {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available"))?;
        let supported_config = device
            .default_output_config()
            .context("error while querying configs")?;
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let remaining = Arc::new(AtomicUsize::new(0));

        let stream = match sample_format {
            cpal::SampleFormat::I8 => Self::build::<i8>(&device, &config, &remaining),
            cpal::SampleFormat::I16 => Self::build::<i16>(&device, &config, &remaining),
            cpal::SampleFormat::I32 => Self::build::<i32>(&device, &config, &remaining),
            cpal::SampleFormat::I64 => Self::build::<i64>(&device, &config, &remaining),
            cpal::SampleFormat::U8 => Self::build::<u8>(&device, &config, &remaining),
            cpal::SampleFormat::U16 => Self::build::<u16>(&device, &config, &remaining),
            cpal::SampleFormat::U32 => Self::build::<u32>(&device, &config, &remaining),
            cpal::SampleFormat::U64 => Self::build::<u64>(&device, &config, &remaining),
            cpal::SampleFormat::F32 => Self::build::<f32>(&device, &config, &remaining),
            cpal::SampleFormat::F64 => Self::build::<f64>(&device, &config, &remaining),
            sample_format => Err(anyhow!("Unsupported sample format '{sample_format}'")),
        }?;
        stream.play()?;

        Ok(Self {
            remaining,
            samples_per_tick: (config.sample_rate.0 as u64 / TIMER_DEC_PER_SECOND) as usize,
            _stream: stream,
        })
    }

    pub fn beep(&self) {
        self.remaining
            .fetch_max(self.samples_per_tick * 2, Ordering::Relaxed);
    }

    fn build<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        remaining: &Arc<AtomicUsize>,
    ) -> anyhow::Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let remaining = Arc::clone(remaining);

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin()
        };

        let err_fn = |err| log::error!("an error occurred on stream: {}", err);

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                write_data(data, channels, &remaining, &mut next_value)
            },
            err_fn,
            None,
        )?;
        Ok(stream)
    }
}

fn write_data<T>(
    output: &mut [T],
    channels: usize,
    remaining: &AtomicUsize,
    next_sample: &mut dyn FnMut() -> f32,
) where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let sounding = remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| left.checked_sub(1))
            .is_ok();
        let value: T = if sounding {
            T::from_sample(next_sample())
        } else {
            T::EQUILIBRIUM
        };
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}
