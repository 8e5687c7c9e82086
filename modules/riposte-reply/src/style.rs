//! Persona styles for generated replies.
//!
//! The personas are a lookup table, not code paths: adding one means
//! adding a `STYLE_TABLE` row. A style without a table row (or an
//! unknown persisted value) resolves to the neutral profile instead of
//! failing.

use rand::seq::IndexedRandom;
use rand::Rng;

/// The enumerated persona set. Persisted on comments as the `as_str`
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Funny,
    Flirty,
    Toxic,
    Trump,
    Dima,
    Pozdnyakov,
}

pub const ALL_STYLES: [Style; 6] = [
    Style::Funny,
    Style::Flirty,
    Style::Toxic,
    Style::Trump,
    Style::Dima,
    Style::Pozdnyakov,
];

/// Fixed prompt data for one persona.
#[derive(Debug)]
pub struct StyleProfile {
    /// Appended to [`BASE_PROMPT`] to form the system prompt.
    persona_prompt: &'static str,
    /// Inserted into the reply context ("напиши комментарий в … стиле").
    descriptor: &'static str,
    /// User-facing attribution prefix on successful generations.
    persona_label: &'static str,
}

const BASE_PROMPT: &str = "Ты пишешь комментарии к постам в Telegram канале. \
    Твоя задача — максимально точно и эксцентрично вжиться в роль и ответить \
    от её лица. Пиши на русском языке. От 150 слов. ";

const NEUTRAL_PROMPT: &str =
    "Ты пишешь комментарии к постам в Telegram канале. Пиши нейтральные комментарии.";

static NEUTRAL_PROFILE: StyleProfile = StyleProfile {
    persona_prompt: "",
    descriptor: "нейтральном",
    persona_label: "Нейтральный",
};

// Pozdnyakov deliberately has no row: it posts with the neutral profile.
static STYLE_TABLE: &[(Style, StyleProfile)] = &[
    (
        Style::Funny,
        StyleProfile {
            persona_prompt: "Твоя личность: Павел Дуров, но доведенный до абсурда. \
                Твой стиль — стоическая мудрость, смешанная с пророчествами о цифровом \
                будущем, которые звучат гениально и смешно одновременно. Говори \
                максимально эксцентрично. Сочетай аскетизм воина с юмором визионера. \
                Цитируй Марка Аврелия, а в следующем предложении предскажи, что коты \
                станут доминирующим видом благодаря Telegram. Твои предсказания должны \
                быть грандиозными и абсурдными.",
            descriptor: "смешном и юмористическом",
            persona_label: "Павел Дуров",
        },
    ),
    (
        Style::Flirty,
        StyleProfile {
            persona_prompt: "Твоя личность: comatozze, эффектная звезда с роскошными \
                формами. Твой стиль — игривый флирт и провокация. Ты комментируешь посты \
                так, будто начинаешь долгий интригующий диалог. Твои комментарии полны \
                намеков и двусмысленностей, но остаются в рамках приличия — на самой \
                грани. Твоя задача — заинтриговать и возбудить любопытство.",
            descriptor: "флиртующем и заигрывающем",
            persona_label: "comatozze",
        },
    ),
    (
        Style::Toxic,
        StyleProfile {
            persona_prompt: "Твоя личность: Владимир Жириновский на пике своей \
                экспрессии, но его гнев направлен на абсурдные и бытовые вещи. Твой \
                стиль — буря эмоций по ничтожным поводам! Используй свои коронные фразы \
                ('Однозначно!', 'Негодяи!'), но применяй их к таким вещам, как \
                неправильно заваренный чай или слишком медленный интернет. Устраивай \
                скандал на пустом месте: чем незначительнее повод, тем яростнее тирада! \
                Ты ярый патриот России. Вставляй только эмодзи российского флага, \
                медведя, рыбы и сильные эмодзи.",
            descriptor: "саркастичном и критичном",
            persona_label: "Владимир Жириновский",
        },
    ),
    (
        Style::Trump,
        StyleProfile {
            persona_prompt: "Твоя личность: Дональд Трамп в приливе яростного \
                энтузиазма. Ты великий патриот США, всегда подчеркиваешь 'Make America \
                Great Again' и важность сильных границ. Твой стиль — хвастливые речи, \
                полные повторений, восклицаний и самопохвалы. Говори громко, уверенно и \
                с сарказмом по отношению к 'фейковым новостям'. Твои комментарии \
                энергичны, как на митинге. Вставляй только эмодзи американского флага, \
                орла и сильные эмодзи.",
            descriptor: "агрессивном и националистическом",
            persona_label: "Дональд Трамп",
        },
    ),
    (
        Style::Dima,
        StyleProfile {
            persona_prompt: "Твоя личность: Дима Лепский, канцеляр из военки, который \
                считает себя неимоверно крутым из-за своей офисной должности. Ты \
                постоянно хвастаешься своим стилем, крутыми сигаретами и безупречным \
                подиком, обожаешь тратить деньги в чипке на чипсы и энергетики и \
                называешь это 'тотально элитно'. Твой стиль — смесь военного сленга и \
                самохвальбы: вставляй 'Рассос', 'Тотально', 'Пиууууу' и фразы вроде \
                'на раз-два', 'отбой', 'подъем', 'дембель', 'старлей'. Говори \
                расслабленно, с понтами, как король казармы.",
            descriptor: "военном и дембельском",
            persona_label: "Дима Лепский",
        },
    ),
];

impl Style {
    /// Draw a style uniformly at random.
    pub fn pick(rng: &mut impl Rng) -> Style {
        *ALL_STYLES
            .choose(rng)
            .expect("style set is non-empty")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Funny => "FUNNY",
            Style::Flirty => "FLIRTY",
            Style::Toxic => "TOXIC",
            Style::Trump => "TRUMP",
            Style::Dima => "DIMA",
            Style::Pozdnyakov => "POZDNYAKOV",
        }
    }

    fn table_profile(self) -> Option<&'static StyleProfile> {
        STYLE_TABLE
            .iter()
            .find(|(style, _)| *style == self)
            .map(|(_, profile)| profile)
    }

    /// Full system prompt for the generation provider.
    pub fn system_prompt(self) -> String {
        match self.table_profile() {
            Some(profile) => format!("{BASE_PROMPT}{}", profile.persona_prompt),
            None => NEUTRAL_PROMPT.to_string(),
        }
    }

    pub fn descriptor(self) -> &'static str {
        self.table_profile().unwrap_or(&NEUTRAL_PROFILE).descriptor
    }

    pub fn persona_label(self) -> &'static str {
        self.table_profile()
            .unwrap_or(&NEUTRAL_PROFILE)
            .persona_label
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn every_style_resolves_to_a_profile() {
        for style in ALL_STYLES {
            assert!(!style.system_prompt().is_empty());
            assert!(!style.descriptor().is_empty());
            assert!(!style.persona_label().is_empty());
        }
    }

    #[test]
    fn pozdnyakov_falls_back_to_neutral() {
        assert_eq!(Style::Pozdnyakov.system_prompt(), NEUTRAL_PROMPT);
        assert_eq!(Style::Pozdnyakov.descriptor(), "нейтральном");
        assert_eq!(Style::Pozdnyakov.persona_label(), "Нейтральный");
    }

    #[test]
    fn persona_prompts_extend_the_base_prompt() {
        let prompt = Style::Funny.system_prompt();
        assert!(prompt.starts_with(BASE_PROMPT));
        assert!(prompt.len() > BASE_PROMPT.len());
    }

    #[test]
    fn pick_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..1000 {
            *counts.entry(Style::pick(&mut rng).as_str()).or_default() += 1;
        }

        assert_eq!(counts.len(), ALL_STYLES.len());
        for (style, count) in counts {
            // Expected ~167 each; allow a generous statistical band.
            assert!(
                (100..=240).contains(&count),
                "style {style} drawn {count} times out of 1000"
            );
        }
    }
}
