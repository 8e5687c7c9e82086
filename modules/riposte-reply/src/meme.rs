//! Meme-style caption compositing: a bordered black canvas with the
//! source image centered and stroke-outlined caption text in the top and
//! bottom padding bands.

use std::io::Cursor;

use ab_glyph::{FontRef, PxScale};
use anyhow::{Context, Result};
use bytes::Bytes;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::layout;

const MEME_FILENAME: &str = "meme.png";

/// Vertical padding as a fraction of the source height (top and bottom).
const PAD_Y_FRACTION: f32 = 0.25;
/// Horizontal padding as a fraction of the source width (left and right).
const PAD_X_FRACTION: f32 = 0.10;

static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Default captions, used when the caller supplies none.
const TOP_PHRASES: &[&str] = &[
    "КОГДА ТЕСТЫ ЗЕЛЁНЫЕ, А ДУША ЧЁРНАЯ",
    "ВКЛЮЧИЛ VPN, А ОН МЕНЯ",
    "КОШКА СИДИТ НА СЕРВЕРЕ И ПУШИТ В МАСТЕР",
    "ПОСТАВИЛ NODE 29, НАВЕРНОЕ, ЛУЧШАЯ ИДЕЯ",
    "ЗАПУСТИЛ DOCKER В MINECRAFT",
    "КОГДА СНИЛС ПРОСИТ JWT",
    "УСЛЫШАЛ ХРУСТ SSD И УСМЕХНУЛСЯ",
    "КОГДА ЛОГИ ГОВОРЯТ “ВСЁ ХОРОШО”",
    "РАССКАЗАЛ МАМЕ ПРО MONOREPO",
    "КОГДА В КОДЕ КАРМА, А НЕ ПРАГА",
    "КОГДА ESLINT ЖЕЛАЕТ ДОБРОГО УТРА",
    "КУПИЛ ПАМЯТЬ, НО НЕ ДЛЯ СЕБЯ",
    "ОТКРЫЛ PR И ЗАКРЫЛСЯ САМ",
    "КОГДА JSON СПРОСИЛ МОЕГО ОТЦА",
    "КОГДА НАКОНЕЦ ПОНЯЛ РЕГЕКСП И СРАЗУ ЗАБЫЛ",
    "КОГДА КОФЕ ПРЕВРАТИЛСЯ В API",
    "КОГДА В ТАСКТРЕКЕРЕ ТАСК “СПАТЬ”",
    "КОГДА СЪЕЛ КЭШ И НЕ СОЖАЛЕЕШЬ",
    "КОГДА ГОЛОС ПРОДАКШНА ЗОВЁТ",
    "КОГДА СКРИПТ БЕЖИТ, А ТЫ — ЗА НИМ",
];

const BOTTOM_PHRASES: &[&str] = &[
    "И ТОЛЬКО ГИТ ПОНИМАЕТ МЕНЯ",
    "ТЕПЕРЬ ЭТО ПРОБЛЕМА FRONTEND",
    "ВСЁ РАБОТАЕТ НА МОЁМ СОЗНАНИИ",
    "КОД НАПИСАН ПОД ВЛИЯНИЕМ ГРАВИТАЦИИ",
    "И МОНАДА ТАК ГОВОРИТ",
    "ТРИ ДЕПЛОЯ СПУСТЯ Я ПОЗНАЛ ПРАВДУ",
    "КОГДА ПРОЦЕСС — ЭТО Я",
    "ОНО КОМПИЛИРУЕТСЯ, НО НЕ ХОЧЕТ ЖИТЬ",
    "И GIT BLAME УКАЗАЛ НА МЕНЯ",
    "КОГДА ПРОД УЖЕ НЕ ПРОД, А СОН",
    "СБОРКА ГОТОВА К ДУХОВНОМУ ПУТИ",
    "ТЕРМИНАЛ ШЕПЧЕТ МОЁ ИМЯ",
    "КОНЕЦ СТРОКИ ПРОДАЛ ДУШУ CARRIAGE RETURN",
    "ФРИЛАНСЕР ВОШЁЛ В ЧАТ РЕЛИГИИ DEVOPS",
    "ВСЕЛЕННАЯ В ОЖИДАНИИ npm install",
    "КОГДА ПУЛ РЕБЁНОК, А НЕ РЕКВЕСТ",
    "СНЫ ОТМОНЖЕНИ К АКТУАЛЬНОЙ ВЕТКЕ",
    "ПРОСТО REVERT И ВСЁ ПРОЙДЁТ",
    "А ПАСТУШОК КОММИТАЕТ ОВЕЦ",
    "КОГДА CI/CD — ЭТО СУДЬБА",
];

/// Explicit caption text for `mutate`. Absent positions fall back to a
/// random default phrase.
#[derive(Debug, Clone, Default)]
pub struct Captions {
    pub top: Option<String>,
    pub bottom: Option<String>,
}

/// An encoded composite ready for transport upload.
#[derive(Debug, Clone)]
pub struct RenderedMeme {
    pub data: Bytes,
    pub filename: String,
}

pub struct MemeCompositor {
    http: reqwest::Client,
    font: FontRef<'static>,
}

impl MemeCompositor {
    pub fn new(http: reqwest::Client) -> Result<Self> {
        let font =
            FontRef::try_from_slice(FONT_BYTES).context("Embedded caption font failed to parse")?;
        Ok(Self { http, font })
    }

    /// Download the source image and composite captions onto it.
    pub async fn mutate(
        &self,
        image_url: &str,
        captions: Captions,
        rng: &mut impl Rng,
    ) -> Result<RenderedMeme> {
        let top = resolve_caption(captions.top, TOP_PHRASES, rng);
        let bottom = resolve_caption(captions.bottom, BOTTOM_PHRASES, rng);

        let bytes = self.download(image_url).await?;
        self.render(&bytes, &top, &bottom)
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        debug!(url, "Downloading source image");

        let resp = self
            .http
            .get(url)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .context("Source image request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Source image fetch failed with status {}", resp.status());
        }

        Ok(resp.bytes().await?)
    }

    fn render(&self, image_bytes: &[u8], top: &str, bottom: &str) -> Result<RenderedMeme> {
        let source = image::load_from_memory(image_bytes)
            .context("Failed to decode source image")?
            .to_rgba8();
        let (src_w, src_h) = source.dimensions();

        let pad_y = (src_h as f32 * PAD_Y_FRACTION) as u32;
        let pad_x = (src_w as f32 * PAD_X_FRACTION) as u32;
        let canvas_w = src_w + pad_x * 2;
        let canvas_h = src_h + pad_y * 2;

        let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, BLACK);
        image::imageops::overlay(&mut canvas, &source, pad_x as i64, pad_y as i64);

        // Top caption centered in the top band, bottom caption in the
        // bottom band (offset by source height + top padding).
        let top_band_center = pad_y as f32 / 2.0;
        let bottom_band_center = (src_h + pad_y) as f32 + pad_y as f32 / 2.0;

        self.draw_caption(&mut canvas, top, canvas_w, top_band_center);
        self.draw_caption(&mut canvas, bottom, canvas_w, bottom_band_center);

        let mut encoded = Cursor::new(Vec::new());
        canvas
            .write_to(&mut encoded, image::ImageFormat::Png)
            .context("Failed to encode composite")?;

        Ok(RenderedMeme {
            data: Bytes::from(encoded.into_inner()),
            filename: MEME_FILENAME.to_string(),
        })
    }

    /// Word-wrap `text` against the canvas width and draw every line
    /// twice: a black outline pass (offset in eight directions by the
    /// stroke width), then the white fill.
    fn draw_caption(&self, canvas: &mut RgbaImage, text: &str, canvas_w: u32, band_center_y: f32) {
        let font_size = layout::font_size(canvas_w);
        let scale = PxScale::from(font_size as f32);
        let stroke = layout::stroke_width(font_size) as i32;
        let line_height = layout::line_height(font_size);

        let lines = layout::wrap_words(text, canvas_w, |candidate| {
            text_size(scale, &self.font, candidate).0 as f32
        });

        for (i, line) in lines.iter().enumerate() {
            let (line_w, _) = text_size(scale, &self.font, line);
            let x = (canvas_w.saturating_sub(line_w) / 2) as i32;
            let center_y = band_center_y + i as f32 * line_height;
            let y = (center_y - font_size as f32 / 2.0) as i32;

            for dx in [-stroke, 0, stroke] {
                for dy in [-stroke, 0, stroke] {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    draw_text_mut(canvas, BLACK, x + dx, y + dy, scale, &self.font, line);
                }
            }
            draw_text_mut(canvas, WHITE, x, y, scale, &self.font, line);
        }
    }
}

fn resolve_caption(explicit: Option<String>, phrases: &[&str], rng: &mut impl Rng) -> String {
    explicit
        .unwrap_or_else(|| {
            phrases
                .choose(rng)
                .expect("phrase table is non-empty")
                .to_string()
        })
        .to_uppercase()
}
