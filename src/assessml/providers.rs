//! Payload providers
//!
//!     The parser never invents payloads itself. Variable values, image sources, graph
//!     equations and shuffle orders come from a [PayloadProvider] supplied by the caller.
//!     Parsing the same document twice only yields the same tree when the provider answers
//!     consistently, which is what [ReferencePayloads] is for: it answers from a tree built
//!     earlier and only falls back to a fresh value for names it has never seen.
//!
//! Stock providers
//!
//!     - [RandomPayloads]: fresh defaults (random integer values, random shuffles).
//!     - [ReferencePayloads]: "repeat attempt" policy backed by a reference tree.
//!     - [FnPayloads]: four plain closures, one per payload.

use crate::assessml::ast::{Node, NodeKind, VarValue};
use crate::assessml::config::RandomConfig;
use crate::assessml::query::{get_payload, Payload};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Resolves the payload of a named node while parsing.
pub trait PayloadProvider {
    fn variable_value(&mut self, var_name: &str) -> VarValue;

    fn image_src(&mut self, var_name: &str) -> String;

    fn graph_equations(&mut self, var_name: &str) -> Vec<String>;

    /// The order for a shuffle, or `None` to let the parser ask for a fresh one.
    fn shuffle_order(&mut self, var_name: &str) -> Option<Vec<usize>>;

    /// A fresh order for `slots`, the positions of a shuffle's non-content children.
    ///
    /// Used when [shuffle_order](PayloadProvider::shuffle_order) has no usable answer.
    /// The default keeps source order.
    fn fresh_shuffle(&mut self, slots: Vec<usize>) -> Vec<usize> {
        slots
    }
}

impl<P: PayloadProvider + ?Sized> PayloadProvider for &mut P {
    fn variable_value(&mut self, var_name: &str) -> VarValue {
        (**self).variable_value(var_name)
    }

    fn image_src(&mut self, var_name: &str) -> String {
        (**self).image_src(var_name)
    }

    fn graph_equations(&mut self, var_name: &str) -> Vec<String> {
        (**self).graph_equations(var_name)
    }

    fn shuffle_order(&mut self, var_name: &str) -> Option<Vec<usize>> {
        (**self).shuffle_order(var_name)
    }

    fn fresh_shuffle(&mut self, slots: Vec<usize>) -> Vec<usize> {
        (**self).fresh_shuffle(slots)
    }
}

/// Default payloads drawn from a random number generator.
pub struct RandomPayloads {
    rng: StdRng,
    variable_range: RangeInclusive<i64>,
}

impl RandomPayloads {
    /// Values in `0..=100`, seeded from the operating system.
    pub fn new() -> Self {
        Self::from_config(&RandomConfig::default())
    }

    /// A reproducible provider.
    pub fn seeded(seed: u64) -> Self {
        Self::from_config(&RandomConfig {
            seed: Some(seed),
            ..RandomConfig::default()
        })
    }

    pub fn from_config(config: &RandomConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (min, max) = if config.variable_min <= config.variable_max {
            (config.variable_min, config.variable_max)
        } else {
            (config.variable_max, config.variable_min)
        };
        RandomPayloads {
            rng,
            variable_range: min..=max,
        }
    }

    /// A 32 hex digit unique name, used for radio groups.
    pub fn unique_name(&mut self) -> String {
        random_hex_id(&mut self.rng)
    }
}

impl Default for RandomPayloads {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadProvider for RandomPayloads {
    fn variable_value(&mut self, _var_name: &str) -> VarValue {
        VarValue::from(self.rng.random_range(self.variable_range.clone()))
    }

    fn image_src(&mut self, _var_name: &str) -> String {
        String::new()
    }

    fn graph_equations(&mut self, _var_name: &str) -> Vec<String> {
        Vec::new()
    }

    fn shuffle_order(&mut self, _var_name: &str) -> Option<Vec<usize>> {
        None
    }

    fn fresh_shuffle(&mut self, mut slots: Vec<usize>) -> Vec<usize> {
        slots.shuffle(&mut self.rng);
        slots
    }
}

/// 32 uppercase hex digits shaped like a version 4 UUID without dashes.
pub fn random_hex_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut digits: Vec<u8> = (0..32).map(|_| rng.random_range(0..16u8)).collect();
    digits[12] = 4;
    digits[16] = (digits[16] & 0x3) | 0x8;
    digits.iter().map(|d| HEX[*d as usize] as char).collect()
}

/// Answers from a previously built tree, deferring to `fallback` for unknown names.
///
/// Lookups are deep: a variable nested in a check body is found just like a top-level one.
pub struct ReferencePayloads<'a, P> {
    reference: &'a [Node],
    fallback: P,
}

impl<'a, P: PayloadProvider> ReferencePayloads<'a, P> {
    pub fn new(reference: &'a [Node], fallback: P) -> Self {
        ReferencePayloads {
            reference,
            fallback,
        }
    }
}

impl<'a> ReferencePayloads<'a, RandomPayloads> {
    /// Reference lookups with fresh random values for anything missing.
    pub fn with_random_fallback(reference: &'a [Node]) -> Self {
        ReferencePayloads::new(reference, RandomPayloads::new())
    }
}

impl<P: PayloadProvider> PayloadProvider for ReferencePayloads<'_, P> {
    fn variable_value(&mut self, var_name: &str) -> VarValue {
        match get_payload(self.reference, NodeKind::Variable, var_name) {
            Some(Payload::Value(value)) => value,
            _ => self.fallback.variable_value(var_name),
        }
    }

    fn image_src(&mut self, var_name: &str) -> String {
        match get_payload(self.reference, NodeKind::Image, var_name) {
            Some(Payload::Src(src)) => src,
            _ => self.fallback.image_src(var_name),
        }
    }

    fn graph_equations(&mut self, var_name: &str) -> Vec<String> {
        match get_payload(self.reference, NodeKind::Graph, var_name) {
            Some(Payload::Equations(equations)) => equations,
            _ => self.fallback.graph_equations(var_name),
        }
    }

    fn shuffle_order(&mut self, var_name: &str) -> Option<Vec<usize>> {
        match get_payload(self.reference, NodeKind::Shuffle, var_name) {
            Some(Payload::Order(order)) => Some(order),
            _ => self.fallback.shuffle_order(var_name),
        }
    }

    fn fresh_shuffle(&mut self, slots: Vec<usize>) -> Vec<usize> {
        self.fallback.fresh_shuffle(slots)
    }
}

/// A provider made of one closure per payload.
pub struct FnPayloads<V, I, G, S> {
    pub variable: V,
    pub image: I,
    pub graph: G,
    pub shuffle: S,
}

impl<V, I, G, S> PayloadProvider for FnPayloads<V, I, G, S>
where
    V: FnMut(&str) -> VarValue,
    I: FnMut(&str) -> String,
    G: FnMut(&str) -> Vec<String>,
    S: FnMut(&str) -> Option<Vec<usize>>,
{
    fn variable_value(&mut self, var_name: &str) -> VarValue {
        (self.variable)(var_name)
    }

    fn image_src(&mut self, var_name: &str) -> String {
        (self.image)(var_name)
    }

    fn graph_equations(&mut self, var_name: &str) -> Vec<String> {
        (self.graph)(var_name)
    }

    fn shuffle_order(&mut self, var_name: &str) -> Option<Vec<usize>> {
        (self.shuffle)(var_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_values_stay_in_range() {
        let mut provider = RandomPayloads::from_config(&RandomConfig {
            variable_min: 3,
            variable_max: 5,
            seed: Some(7),
        });
        for _ in 0..50 {
            match provider.variable_value("var1") {
                VarValue::Number(n) => assert!((3.0..=5.0).contains(&n)),
                other => panic!("Expected a number, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_seeded_providers_agree() {
        let mut a = RandomPayloads::seeded(11);
        let mut b = RandomPayloads::seeded(11);
        assert_eq!(a.variable_value("var1"), b.variable_value("var1"));
        assert_eq!(
            a.fresh_shuffle(vec![0, 2, 4, 6]),
            b.fresh_shuffle(vec![0, 2, 4, 6])
        );
        assert_eq!(a.unique_name(), b.unique_name());
    }

    #[test]
    fn test_fresh_shuffle_is_a_permutation() {
        let mut provider = RandomPayloads::seeded(3);
        let mut order = provider.fresh_shuffle(vec![1, 3, 5, 7, 9]);
        order.sort();
        assert_eq!(order, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_random_hex_id_shape() {
        let mut provider = RandomPayloads::seeded(5);
        let id = provider.unique_name();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id.as_bytes()[12], b'4');
        assert!(matches!(id.as_bytes()[16], b'8' | b'9' | b'A' | b'B'));
    }

    #[test]
    fn test_reference_payloads_prefer_reference() {
        let reference = vec![
            Node::variable("var1", 42),
            Node::container(
                NodeKind::Check,
                "check1",
                vec![Node::image("img1", "cat.png")],
            )
            .unwrap(),
        ];
        let fallback = FnPayloads {
            variable: |_: &str| VarValue::from(-1),
            image: |_: &str| "fallback.png".to_string(),
            graph: |_: &str| vec!["x".to_string()],
            shuffle: |_: &str| None,
        };
        let mut provider = ReferencePayloads::new(&reference, fallback);

        assert_eq!(provider.variable_value("var1"), VarValue::from(42));
        assert_eq!(provider.variable_value("var2"), VarValue::from(-1));
        assert_eq!(provider.image_src("img1"), "cat.png");
        assert_eq!(provider.image_src("img2"), "fallback.png");
        assert_eq!(provider.graph_equations("graph1"), vec!["x".to_string()]);
        assert_eq!(provider.shuffle_order("shuffle1"), None);
    }

    #[test]
    fn test_default_fresh_shuffle_keeps_order() {
        let mut provider = FnPayloads {
            variable: |_: &str| VarValue::from(0),
            image: |_: &str| String::new(),
            graph: |_: &str| Vec::new(),
            shuffle: |_: &str| None,
        };
        assert_eq!(provider.fresh_shuffle(vec![0, 2]), vec![0, 2]);
    }
}
