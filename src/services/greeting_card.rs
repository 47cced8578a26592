use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::services::providers::{ChatProvider, Prompt};

/// Recipient used when the request names nobody
pub const DEFAULT_RECIPIENT: &str = "聖誕甜點好友";

const TEMPERATURE: f32 = 0.8;
const MAX_DESSERTS: usize = 3;
const MIN_MESSAGE_CHARS: usize = 10;

/// Voice of a Christmas card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Warm,
    Festive,
    Classic,
}

impl Tone {
    /// Parses a tone name; unknown names fall back to `Warm`
    pub fn parse(raw: &str) -> Tone {
        match raw.trim().to_lowercase().as_str() {
            "festive" => Tone::Festive,
            "classic" => Tone::Classic,
            _ => Tone::Warm,
        }
    }

    /// Register handed to the model
    fn description(&self) -> &'static str {
        match self {
            Tone::Warm => "溫暖、真摯、甜蜜",
            Tone::Festive => "歡樂、活潑、充滿驚喜",
            Tone::Classic => "優雅、正式、傳統",
        }
    }

    /// Canned greeting used whenever the model is unavailable or unhelpful
    pub fn fallback_message(&self, recipient: &str, dessert_text: &str) -> String {
        let has_desserts = !dessert_text.is_empty();
        match self {
            Tone::Warm => {
                let desserts = if has_desserts {
                    format!("特別為你準備了{}，", dessert_text)
                } else {
                    String::new()
                };
                format!(
                    "親愛的 {}，願這個冬夜被閃爍燈火和甜香包圍，{}願你心裡的願望都在雪花落下時悄悄成真 🎄✨",
                    recipient, desserts
                )
            }
            Tone::Festive => {
                let desserts = if has_desserts {
                    format!("還有{}等著你，", dessert_text)
                } else {
                    String::new()
                };
                format!(
                    "嗨嗨！{}，聖誕老公公已經把快樂裝進雪橇，{}祝你今晚被驚喜和美味包圍 🎅🏼🎉",
                    recipient, desserts
                )
            }
            Tone::Classic => {
                let desserts = if has_desserts {
                    format!("為你獻上{}，", dessert_text)
                } else {
                    String::new()
                };
                format!(
                    "敬愛的 {}，伴隨著聖誕鐘聲，{}願平安與喜樂在這個季節長駐你心，祝聖誕快樂。",
                    recipient, desserts
                )
            }
        }
    }
}

/// A generated greeting
///
/// `ai_generated` reports whether a model was configured for the request,
/// even when its reply was rejected and the fallback text was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMessage {
    pub text: String,
    pub ai_generated: bool,
}

/// Writes Christmas-card greetings
#[derive(Clone)]
pub struct CardGenerator {
    provider: Option<Arc<dyn ChatProvider>>,
}

impl CardGenerator {
    pub fn new(provider: Option<Arc<dyn ChatProvider>>) -> Self {
        Self { provider }
    }

    /// Produces a greeting for the recipient, never failing
    pub async fn generate(&self, recipient: &str, desserts: &[String], tone: Tone) -> CardMessage {
        let dessert_text = join_desserts(desserts);
        let fallback = CardMessage {
            text: tone.fallback_message(recipient, &dessert_text),
            ai_generated: self.provider.is_some(),
        };

        let Some(provider) = &self.provider else {
            return fallback;
        };

        let prompt = build_prompt(recipient, &dessert_text, tone);
        match provider.generate(&prompt).await {
            Ok(content) => {
                let text = strip_quotes(content.trim());
                if text.chars().count() > MIN_MESSAGE_CHARS {
                    CardMessage {
                        text: text.to_string(),
                        ai_generated: true,
                    }
                } else {
                    tracing::warn!(
                        provider = provider.name(),
                        response = %content,
                        "Card response too short, using fallback"
                    );
                    fallback
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    "Card generation failed, using fallback"
                );
                fallback
            }
        }
    }
}

/// First few dessert names joined with the ideographic comma
fn join_desserts(desserts: &[String]) -> String {
    desserts
        .iter()
        .take(MAX_DESSERTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("、")
}

fn build_prompt(recipient: &str, dessert_text: &str, tone: Tone) -> Prompt {
    let system = "你是一位來自台灣、擅長撰寫溫馨祝福語的聖誕卡片專家。\
                  你必須全程使用繁體中文回覆，絕對禁止使用簡體中文。\
                  你絕對不可以夾雜任何英文單字或詞彙，所有內容必須是純繁體中文。\
                  請撰寫一段聖誕祝福卡片內容，長度約三到四句話。\
                  內容需充滿聖誕節的溫暖氛圍，讓收到的人感受到滿滿的祝福與愛。\
                  可以適當使用聖誕相關的表情符號，如 🎄✨🎁🎅🏼❄️🌟 等。\
                  只輸出祝福語內容，不要加入任何額外說明或標記。";

    let mut user = format!(
        "請為「{}」撰寫一張聖誕祝福卡片。\n語氣風格：{}\n",
        recipient,
        tone.description()
    );
    if !dessert_text.is_empty() {
        user.push_str(&format!("卡片中請自然地提及這些甜點：{}\n", dessert_text));
    }
    user.push_str("請直接輸出祝福語內容。");

    Prompt::new(system, user, TEMPERATURE)
}

/// Strips one pair of ASCII double quotes, then one pair of corner brackets
pub fn strip_quotes(content: &str) -> &str {
    let content = content
        .strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(content);
    content
        .strip_prefix('「')
        .and_then(|c| c.strip_suffix('」'))
        .unwrap_or(content)
}
