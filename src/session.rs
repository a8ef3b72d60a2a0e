use std::{future::Future, sync::LazyLock};

use regex::Regex;

use crate::{
    capture::CaptureEngine,
    cmd::Cmd,
    codec,
    config::Config,
    error::{Error, Result},
    metrics::Analyzer,
    raster::{PixelBuffer, Rasterizer},
    score::{EvaluationResult, Scorer},
};

/// Decodes an encoded raster, measures it and scores it against `character`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    pub analyzer: Analyzer,
    pub scorer: Scorer,
}

impl Evaluator {
    pub async fn evaluate(&self, encoded_image: &str, character: &str) -> Result<EvaluationResult> {
        let buf = codec::decode_base64(encoded_image)?;
        let metrics = self.analyzer.analyze(&buf);
        Ok(self.scorer.score(&metrics, character))
    }
}

/// One practice run: the practice list, which character is being written and the strokes so far.
#[derive(Debug)]
pub struct Session {
    characters: Vec<String>,
    current: usize,
    capture: CaptureEngine,
    width: u32,
    height: u32,
    rasterizer: Rasterizer,
    evaluator: Evaluator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            characters: config
                .characters
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            current: 0,
            capture: CaptureEngine::new(),
            width: config.canvas.width,
            height: config.canvas.height,
            rasterizer: config.rasterizer(),
            evaluator: Evaluator {
                analyzer: config.analyzer(),
                scorer: config.scorer(),
            },
        }
    }

    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    pub fn current_character(&self) -> &str {
        self.characters
            .get(self.current)
            .map_or("", String::as_str)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Switches to the character at `index`, discarding the current drawing.
    ///
    /// Returns `false` (and changes nothing) if `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.characters.len() {
            return false;
        }
        self.current = index;
        self.capture.clear();
        log::info!("practicing '{}'", self.current_character());
        true
    }

    /// Moves on to the next character, wrapping around at the end of the list.
    pub fn next_character(&mut self) {
        let next = (self.current + 1) % self.characters.len().max(1);
        self.select(next);
    }

    /// Adds the Han characters found in `text` (e.g. OCR output) to the practice list.
    ///
    /// Everything that is not Han script is ignored; characters already in the list are skipped.
    /// Returns the number of characters added.
    pub fn merge_characters(&mut self, text: &str) -> usize {
        static HAN: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\p{Han}").expect("invalid Han pattern"));

        let before = self.characters.len();
        for m in HAN.find_iter(text) {
            if !self.characters.iter().any(|c| c == m.as_str()) {
                self.characters.push(m.as_str().to_string());
            }
        }
        let added = self.characters.len() - before;
        if added > 0 {
            log::info!("added {added} characters to the practice list");
        }
        added
    }

    pub fn capture(&self) -> &CaptureEngine {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut CaptureEngine {
        &mut self.capture
    }

    pub fn handle(&mut self, cmd: Cmd) {
        self.capture.handle(cmd);
    }

    /// Renders the current drawing without evaluating it. `None` if nothing was drawn.
    pub fn render(&self) -> Result<Option<PixelBuffer>> {
        self.rasterizer
            .rasterize(&self.capture.snapshot(), self.width, self.height)
    }

    /// Starts evaluating the current drawing against the current character.
    ///
    /// The drawing is copied before this returns, so the session can keep taking input (or move to
    /// another character) while the returned future is pending.
    pub fn submit(
        &self,
    ) -> Result<impl Future<Output = Result<EvaluationResult>> + Send + 'static> {
        let drawing = self.capture.snapshot();
        if drawing.is_empty() {
            return Err(Error::EmptyDrawing);
        }

        let (rasterizer, evaluator) = (self.rasterizer, self.evaluator);
        let (width, height) = (self.width, self.height);
        let character = self.current_character().to_string();
        Ok(async move {
            let buf = rasterizer
                .rasterize(&drawing, width, height)?
                .ok_or(Error::EmptyDrawing)?;
            let payload = codec::encode_base64(&buf)?;
            evaluator.evaluate(&payload, &character).await
        })
    }
}
