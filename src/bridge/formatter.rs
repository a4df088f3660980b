//! Message template rendering.
//!
//! Handles placeholder substitution in configured message templates.
//! Supports placeholders: {online_count}, {player}

/// Replaced with the number of players online when the event is rendered.
pub const PLACEHOLDER_ONLINE_COUNT: &str = "{online_count}";

/// Replaced with the escaped player name (join/leave only).
pub const PLACEHOLDER_PLAYER: &str = "{player}";

/// Values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext<'a> {
    /// Players online at render time.
    pub online_count: usize,
    /// Player the event is about, if any.
    pub player: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    pub fn new(online_count: usize) -> Self {
        Self {
            online_count,
            player: None,
        }
    }

    /// Set the player.
    pub fn with_player(mut self, player: &'a str) -> Self {
        self.player = Some(player);
        self
    }
}

/// Renders configured templates. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Render `template` with `ctx`.
    ///
    /// Returns `None` when the template is empty or whitespace, which mutes
    /// that event. Unknown `{...}` tokens pass through unchanged, as does
    /// `{player}` when the context has no player.
    pub fn render(&self, template: &str, ctx: &RenderContext<'_>) -> Option<String> {
        if template.trim().is_empty() {
            return None;
        }

        let rendered = template.replace(PLACEHOLDER_ONLINE_COUNT, &ctx.online_count.to_string());

        // Player last, so a name that looks like a placeholder stays literal.
        Some(match ctx.player {
            Some(player) => rendered.replace(PLACEHOLDER_PLAYER, &escape_underscores(player)),
            None => rendered,
        })
    }
}

/// Escape underscores so Discord doesn't read them as emphasis.
pub fn escape_underscores(name: &str) -> String {
    name.replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, ctx: &RenderContext<'_>) -> Option<String> {
        TemplateRenderer.render(template, ctx)
    }

    #[test]
    fn test_welcome_message() {
        let ctx = RenderContext::new(5).with_player("foo_bar");
        assert_eq!(
            render("Welcome {player}! Online: {online_count}", &ctx).as_deref(),
            Some("Welcome foo\\_bar! Online: 5")
        );
    }

    #[test]
    fn test_every_online_count_replaced() {
        let template = "{online_count}/{online_count} slots; was {online_count}";
        let ctx = RenderContext::new(12);
        assert_eq!(render(template, &ctx).as_deref(), Some("12/12 slots; was 12"));
    }

    #[test]
    fn test_online_count_leaves_rest_untouched() {
        let template = "  Players: {online_count} (max 100)  ";
        let rendered = render(template, &RenderContext::new(0)).unwrap();
        assert_eq!(rendered, "  Players: 0 (max 100)  ");
    }

    #[test]
    fn test_underscores_escaped_exactly() {
        for name in ["_", "a_b_c", "__init__", "no-underscores", "x_"] {
            let k = name.matches('_').count();
            let rendered = render("{player}", &RenderContext::new(1).with_player(name)).unwrap();

            assert_eq!(rendered.matches("\\_").count(), k, "name {}", name);
            let unescaped = rendered.replace("\\_", "");
            assert!(!unescaped.contains('_'), "name {}", name);
        }
    }

    #[test]
    fn test_blank_template_mutes() {
        let ctx = RenderContext::new(3).with_player("Steve");
        assert_eq!(render("", &ctx), None);
        assert_eq!(render("   \n\t", &ctx), None);
    }

    #[test]
    fn test_unknown_placeholders_pass_through() {
        let ctx = RenderContext::new(2).with_player("Alex");
        assert_eq!(
            render("{velocity_online} {server} {player}", &ctx).as_deref(),
            Some("{velocity_online} {server} Alex")
        );
    }

    #[test]
    fn test_player_placeholder_kept_without_player() {
        let ctx = RenderContext::new(4);
        assert_eq!(
            render("Bye {player} ({online_count})", &ctx).as_deref(),
            Some("Bye {player} (4)")
        );
    }

    #[test]
    fn test_player_name_not_rescanned() {
        let ctx = RenderContext::new(9).with_player("{online_count}");
        assert_eq!(render("{player}", &ctx).as_deref(), Some("{online\\_count}"));

        let ctx = RenderContext::new(9).with_player("{player}");
        assert_eq!(render("<{player}>", &ctx).as_deref(), Some("<{player}>"));
    }

    #[test]
    fn test_render_is_repeatable() {
        let template = String::from("{player} joined ({online_count})");
        let ctx = RenderContext::new(7).with_player("a_b");
        let first = render(&template, &ctx);
        let second = render(&template, &ctx);
        assert_eq!(first, second);
        assert_eq!(template, "{player} joined ({online_count})");
    }
}
