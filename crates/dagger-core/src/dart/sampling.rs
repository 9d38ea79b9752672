//! Token sampling over decoder logits.
//!
//! Temperature scaling, then top-k and top-p truncation, then a weighted
//! draw. With `temperature` near zero or `top_k == 1` this degenerates to
//! argmax, which the tests rely on.

use rand::Rng;

use super::GenerationConfig;

/// Sample the next token id from a logit slice.
pub fn sample_token<R: Rng>(logits: &[f32], config: &GenerationConfig, rng: &mut R) -> usize {
    // Candidate indices sorted by logit descending.
    let mut candidates: Vec<usize> = (0..logits.len()).collect();
    candidates.sort_by(|&a, &b| logits[b].total_cmp(&logits[a]));

    if config.top_k > 0 {
        candidates.truncate(config.top_k);
    }

    // Softmax over the surviving candidates, numerically stabilized.
    let max_logit = logits[candidates[0]];
    let temperature = config.temperature.max(1e-6);
    let mut probs: Vec<f32> = candidates
        .iter()
        .map(|&i| ((logits[i] - max_logit) / temperature).exp())
        .collect();
    let sum: f32 = probs.iter().sum();
    for p in &mut probs {
        *p /= sum;
    }

    // Nucleus truncation: keep the smallest prefix with cumulative mass
    // >= top_p. The highest-probability token always survives.
    if config.top_p < 1.0 {
        let mut cumulative = 0.0;
        let mut cutoff = probs.len();
        for (i, &p) in probs.iter().enumerate() {
            cumulative += p;
            if cumulative >= config.top_p {
                cutoff = i + 1;
                break;
            }
        }
        candidates.truncate(cutoff);
        probs.truncate(cutoff);
    }

    // Weighted draw.
    let total: f32 = probs.iter().sum();
    let mut draw = rng.gen_range(0.0..1.0) * total;
    for (&candidate, &p) in candidates.iter().zip(probs.iter()) {
        draw -= p;
        if draw <= 0.0 {
            return candidate;
        }
    }
    candidates[candidates.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_top_k_one_is_argmax() {
        let logits = vec![0.1, 3.0, -1.0, 2.5];
        let config = GenerationConfig {
            top_k: 1,
            ..Default::default()
        };
        for _ in 0..10 {
            assert_eq!(sample_token(&logits, &config, &mut rng()), 1);
        }
    }

    #[test]
    fn test_low_temperature_concentrates_on_max() {
        let logits = vec![1.0, 5.0, 1.0];
        let config = GenerationConfig {
            temperature: 0.01,
            top_k: 0,
            ..Default::default()
        };
        let mut r = rng();
        for _ in 0..50 {
            assert_eq!(sample_token(&logits, &config, &mut r), 1);
        }
    }

    #[test]
    fn test_tight_top_p_keeps_best_token() {
        let logits = vec![0.0, 10.0, 0.0];
        let config = GenerationConfig {
            top_p: 0.01,
            ..Default::default()
        };
        assert_eq!(sample_token(&logits, &config, &mut rng()), 1);
    }

    #[test]
    fn test_samples_stay_within_top_k() {
        let logits = vec![5.0, 4.9, 4.8, -100.0, -100.0];
        let config = GenerationConfig {
            top_k: 3,
            ..Default::default()
        };
        let mut r = rng();
        for _ in 0..100 {
            let token = sample_token(&logits, &config, &mut r);
            assert!(token < 3, "sampled outside top-k: {token}");
        }
    }

    #[test]
    fn test_single_candidate() {
        let logits = vec![0.5];
        let config = GenerationConfig::default();
        assert_eq!(sample_token(&logits, &config, &mut rng()), 0);
    }
}
