use std::{
    io::Cursor,
    sync::{Arc, Mutex},
};
use slidecast_core::{SpeechRequest, SpeechSynthesizer, TtsError};

/// Answers every request with a silent WAV of `seconds` length.
#[derive(Clone)]
pub struct MockSynthesizer {
    pub seconds: f64,
    pub calls: Arc<Mutex<Vec<SpeechRequest>>>,
    pub fail_with: Option<String>,
}

impl MockSynthesizer {
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            seconds: 0.0,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

pub fn silent_wav(seconds: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..(seconds * 8000.0) as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, TtsError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(TtsError::Api {
                status: 401,
                message: msg.clone(),
            });
        }
        Ok(silent_wav(self.seconds))
    }
}
