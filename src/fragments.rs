use std::ops::Range;

use rand::Rng;

pub const LAYER_CLASS: &str = "cube-code-bg";

/// Snippets that drift across the background at normal size.
pub const NORMAL_FRAGMENTS: &[&str] = &[
    // Go
    "func main() {",
    "type T struct {",
    "go func() {",
    "defer wg.Done()",
    "ctx, cancel :=",
    "err != nil {",
    "ch <- result",
    ":= make(chan)",
    // SQL
    "SELECT * FROM",
    "JOIN ON id =",
    "WHERE created_at",
    "GROUP BY user",
    "INSERT INTO",
    "BEGIN TRANSACTION",
    // Cloud / DevOps
    "docker build -t",
    "kubectl apply -f",
    "terraform plan",
    "helm upgrade",
    "nginx.conf",
    "ENV NODE_ENV=",
    "EXPOSE 8080",
    "RUN apt-get -y",
    // JS / TS
    "const x = () =>",
    "useEffect([], [])",
    "async/await",
    "Promise.all()",
    "export default",
    "import React from",
    ".then(res =>",
    "useState(null)",
    // Infra
    "redis.Set(ctx,)",
    "pub.Publish(ch)",
    "rabbitmq.Dial()",
    "grpc.Dial(addr)",
    "npm install",
    "git commit -m",
    "ssh ubuntu@",
];

/// Large, hazy snippets that sit behind the middle of the cube.
pub const ZOOMED_FRAGMENTS: &[&str] = &["func()", "{  }", "=>", "nil", "err", "ctx", "[]T", "go"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentTier {
    Normal,
    Zoomed,
}

/// Random ranges for one tier. Percentages for position, pixels for font
/// size, seconds for animation duration.
#[derive(Debug, Clone)]
pub struct TierBounds {
    pub left: Range<f64>,
    pub top: Range<f64>,
    pub font_size: Range<f64>,
    pub duration: Range<f64>,
}

impl FragmentTier {
    pub fn bounds(self) -> TierBounds {
        match self {
            FragmentTier::Normal => TierBounds {
                left: 4.0..92.0,
                top: 4.0..92.0,
                font_size: 10.0..15.0,
                duration: 20.0..42.0,
            },
            FragmentTier::Zoomed => TierBounds {
                left: 20.0..65.0,
                top: 15.0..80.0,
                font_size: 28.0..56.0,
                duration: 25.0..45.0,
            },
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            FragmentTier::Normal => "cube-code-frag",
            FragmentTier::Zoomed => "cube-code-frag cube-code-zoom",
        }
    }
}

/// One floating text node, fully resolved before it touches the DOM.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeFragment {
    pub text: &'static str,
    pub tier: FragmentTier,
    pub left: f64,
    pub top: f64,
    pub font_size: f64,
    pub duration: f64,
    /// Never positive, so the stylesheet animation starts mid-flight instead of
    /// every fragment popping in at once.
    pub delay: f64,
}

impl CodeFragment {
    fn random(text: &'static str, tier: FragmentTier, rng: &mut impl Rng) -> Self {
        let bounds = tier.bounds();
        let duration = rng.gen_range(bounds.duration);

        Self {
            text,
            tier,
            left: rng.gen_range(bounds.left),
            top: rng.gen_range(bounds.top),
            font_size: rng.gen_range(bounds.font_size),
            duration,
            delay: -rng.gen_range(0.0..duration),
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.tier.class_name()
    }

    pub fn css_text(&self) -> String {
        format!(
            "left:{}%;top:{}%;font-size:{}px;animation-duration:{}s;animation-delay:{}s;",
            self.left, self.top, self.font_size, self.duration, self.delay
        )
    }
}

/// Rolls a fragment for every string in both pools, normal tier first.
pub fn spawn_fragments(
    normal: &[&'static str],
    zoomed: &[&'static str],
    rng: &mut impl Rng,
) -> Vec<CodeFragment> {
    let normal = normal
        .iter()
        .map(|text| (*text, FragmentTier::Normal))
        .collect::<Vec<_>>();
    let zoomed = zoomed.iter().map(|text| (*text, FragmentTier::Zoomed));

    normal
        .into_iter()
        .chain(zoomed)
        .map(|(text, tier)| CodeFragment::random(text, tier, &mut *rng))
        .collect()
}

pub fn spawn_default_fragments(rng: &mut impl Rng) -> Vec<CodeFragment> {
    spawn_fragments(NORMAL_FRAGMENTS, ZOOMED_FRAGMENTS, rng)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn one_fragment_per_pool_entry() {
        let mut rng = StdRng::seed_from_u64(7);
        let fragments = spawn_default_fragments(&mut rng);

        assert_eq!(
            fragments.len(),
            NORMAL_FRAGMENTS.len() + ZOOMED_FRAGMENTS.len()
        );

        let zoomed = fragments
            .iter()
            .filter(|f| f.tier == FragmentTier::Zoomed)
            .count();
        assert_eq!(zoomed, ZOOMED_FRAGMENTS.len());
        assert_eq!(fragments[0].text, NORMAL_FRAGMENTS[0]);
    }

    #[test]
    fn fragments_stay_inside_tier_bounds() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            for fragment in spawn_default_fragments(&mut rng) {
                let bounds = fragment.tier.bounds();
                assert!(bounds.left.contains(&fragment.left));
                assert!(bounds.top.contains(&fragment.top));
                assert!(bounds.font_size.contains(&fragment.font_size));
                assert!(bounds.duration.contains(&fragment.duration));
                assert!(fragment.delay <= 0.0);
                assert!(fragment.delay > -fragment.duration);
            }
        }
    }

    #[test]
    fn zoomed_tier_sits_in_the_middle() {
        let bounds = FragmentTier::Zoomed.bounds();
        assert_eq!(bounds.left, 20.0..65.0);
        assert_eq!(bounds.top, 15.0..80.0);
    }

    #[test]
    fn css_text_carries_every_animation_hook() {
        let fragment = CodeFragment {
            text: "nil",
            tier: FragmentTier::Zoomed,
            left: 30.0,
            top: 40.5,
            font_size: 32.0,
            duration: 30.0,
            delay: -12.25,
        };

        assert_eq!(
            fragment.css_text(),
            "left:30%;top:40.5%;font-size:32px;animation-duration:30s;animation-delay:-12.25s;"
        );
        assert_eq!(fragment.class_name(), "cube-code-frag cube-code-zoom");
    }

    #[test]
    fn empty_pools_spawn_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(spawn_fragments(&[], &[], &mut rng).is_empty());
    }
}
