use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{Recipe, TotalTime};
use crate::services::providers::{ChatProvider, Prompt};

/// Shown when there is nothing (or only one dessert) to explain
pub const GENERIC_REASON: &str = "這道甜點非常適合聖誕節！";

const TEMPERATURE: f32 = 0.7;

/// What the user asked for, echoed to the model as context
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestContext {
    #[serde(rename = "type")]
    pub dessert_type: String,
    pub time: Option<i64>,
    pub restrictions: Vec<String>,
}

#[derive(Serialize)]
struct DessertBrief<'a> {
    name: &'a str,
    total_time: &'a TotalTime,
    ingredients: &'a [String],
    country: Option<&'a str>,
}

impl<'a> From<&'a Recipe> for DessertBrief<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            name: &recipe.name,
            total_time: &recipe.total_time,
            ingredients: &recipe.ingredients,
            country: recipe.country.as_deref(),
        }
    }
}

#[derive(Deserialize)]
struct ReasonItem {
    #[serde(default)]
    reason: Option<String>,
}

/// Writes short festive blurbs explaining each recommendation
#[derive(Clone)]
pub struct ReasonGenerator {
    provider: Option<Arc<dyn ChatProvider>>,
}

impl ReasonGenerator {
    pub fn new(provider: Option<Arc<dyn ChatProvider>>) -> Self {
        Self { provider }
    }

    /// One reason per recipe, never failing
    ///
    /// Two recipes are needed for a model call; with fewer the generic line
    /// is returned. Any provider or parsing failure yields the templates.
    pub async fn generate(&self, recipes: &[&Recipe], context: &RequestContext) -> Vec<String> {
        let (first, second) = match recipes {
            [first, second, ..] => (*first, *second),
            _ => return vec![GENERIC_REASON.to_string()],
        };

        let Some(provider) = &self.provider else {
            return template_reasons(first, second);
        };

        let prompt = build_prompt(first, second, context);
        match provider.generate(&prompt).await {
            Ok(content) => match parse_reasons(&content) {
                Some(reasons) => reasons,
                None => {
                    tracing::warn!(
                        provider = provider.name(),
                        response = %content,
                        "Unusable reason response, using templates"
                    );
                    template_reasons(first, second)
                }
            },
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    "Reason generation failed, using templates"
                );
                template_reasons(first, second)
            }
        }
    }
}

fn template_reasons(first: &Recipe, second: &Recipe) -> Vec<String> {
    vec![
        format!("因為你選擇了 {}，它能在節慶裡帶來甜蜜的陪伴。", first.name),
        format!("另外推薦 {}，暖暖香氣很適合聖誕夜。", second.name),
    ]
}

fn build_prompt(first: &Recipe, second: &Recipe, context: &RequestContext) -> Prompt {
    let system = format!(
        "你是一位來自台灣、擁有多年經驗的聖誕節甜點專家。\
         你必須全程使用繁體中文回覆，絕對禁止使用簡體中文。\
         你絕對不可以夾雜任何英文單字或詞彙，所有內容必須是純繁體中文。\
         請以溫暖、真摯、帶有濃厚聖誕節氣氛的台灣在地語氣撰寫內容，語氣需甜蜜、溫馨。\
         針對使用者條件，為兩道甜點各寫一段兩句以內的推薦理由。\
         推薦理由需能讓人感受到聖誕節的溫暖、甜蜜與節慶氛圍。\
         句子需自然、貼近台灣人的日常語氣，不可僵硬或像官方文宣。\
         第一道甜點名稱是「{}」，第二道甜點名稱是「{}」。\
         輸出格式為純 JSON 陣列，格式如下：\n\
         [{{\"name\": \"第一道甜點完整名稱\", \"reason\": \"推薦理由\"}}, {{\"name\": \"第二道甜點完整名稱\", \"reason\": \"推薦理由\"}}]\n\
         只允許輸出 JSON，不得加入任何額外文字、說明、markdown 標記或程式碼區塊符號。",
        first.name, second.name
    );

    let payload = json!({
        "user_preferences": context,
        "desserts": [DessertBrief::from(first), DessertBrief::from(second)],
    });
    let user = format!("以下是使用者的條件與候選甜點，請依指示產生回覆：\n{}", payload);

    Prompt::new(system, user, TEMPERATURE)
}

/// Removes Markdown code fences (```` ```json ```` or ```` ``` ````) and the
/// whitespace that follows each fence
pub fn strip_code_fences(content: &str) -> String {
    if !content.contains("```") {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        rest = rest.strip_prefix("json").unwrap_or(rest);
        rest = rest.trim_start();
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Reads the first two non-empty reasons from a model reply
fn parse_reasons(content: &str) -> Option<Vec<String>> {
    let cleaned = strip_code_fences(content.trim());
    let items: Vec<Value> = serde_json::from_str(&cleaned).ok()?;

    let mut reasons = Vec::with_capacity(2);
    for item in items.into_iter().take(2) {
        let item: ReasonItem = serde_json::from_value(item).ok()?;
        if let Some(reason) = item.reason.filter(|r| !r.is_empty()) {
            reasons.push(reason);
        }
    }

    (reasons.len() >= 2).then_some(reasons)
}
