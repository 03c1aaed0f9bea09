use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::render_json;
    use crate::catalog::Element;

    #[test]
    fn renders_enums_as_snake_case() {
        let rendered = render_json(&[Element::Solar, Element::Kinetic]).expect("render");
        assert_eq!(rendered, "[\n  \"solar\",\n  \"kinetic\"\n]");
    }
}
