//! Pure projection of the flat metric list into chart-ready trend series.

use crate::api::models::{MetricKind, MetricSample};

/// How many of the newest samples feed the trend chart.
pub const TREND_WINDOW: usize = 40;

/// Aligned, gap-tolerant series for the CPU/memory trend chart.
///
/// `cpu` and `memory` are index-aligned with `labels`; `None` marks an
/// index where that series has no sample and must be rendered as a gap,
/// never as zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub cpu: Vec<Option<f64>>,
    pub memory: Vec<Option<f64>>,
}

/// Projects the newest-first metric list into chronological trend series.
///
/// Takes the newest `window` samples, reverses them into chronological
/// order, partitions by metric kind preserving relative order, then builds
/// a label axis of the longer series' length. The label at index `i` is
/// the cpu timestamp when present, else the memory timestamp, else a
/// synthetic positional `"#<i+1>"`.
///
/// Deterministic for a given input; performs no I/O.
pub fn project_trend(metrics: &[MetricSample], window: usize) -> TrendSeries {
    let recent: Vec<&MetricSample> = metrics.iter().take(window).rev().collect();

    let cpu: Vec<&MetricSample> = recent
        .iter()
        .copied()
        .filter(|m| m.metric_type == MetricKind::Cpu)
        .collect();
    let memory: Vec<&MetricSample> = recent
        .iter()
        .copied()
        .filter(|m| m.metric_type == MetricKind::Memory)
        .collect();

    let len = cpu.len().max(memory.len());
    let mut series = TrendSeries {
        labels: Vec::with_capacity(len),
        cpu: Vec::with_capacity(len),
        memory: Vec::with_capacity(len),
    };
    for i in 0..len {
        let label = cpu
            .get(i)
            .or_else(|| memory.get(i))
            .map(|m| m.ts.clone())
            .unwrap_or_else(|| format!("#{}", i + 1));
        series.labels.push(label);
        series.cpu.push(cpu.get(i).map(|m| m.value));
        series.memory.push(memory.get(i).map(|m| m.value));
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i64, kind: MetricKind, value: f64, ts: &str) -> MetricSample {
        MetricSample {
            id,
            metric_type: kind,
            value,
            ts: ts.to_string(),
        }
    }

    #[test]
    fn aligns_series_and_fills_gaps_with_none() {
        // Newest-first input, as the backend returns it.
        let metrics = vec![
            sample(4, MetricKind::Cpu, 10.0, "t3"),
            sample(3, MetricKind::Memory, 20.0, "t3"),
            sample(2, MetricKind::Cpu, 12.0, "t2"),
            sample(1, MetricKind::Cpu, 14.0, "t1"),
        ];
        let trend = project_trend(&metrics, 10);
        assert_eq!(trend.cpu, vec![Some(14.0), Some(12.0), Some(10.0)]);
        assert_eq!(trend.memory, vec![None, None, Some(20.0)]);
        assert_eq!(trend.labels, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn window_keeps_only_the_newest_samples() {
        let metrics: Vec<MetricSample> = (0..6)
            .map(|i| sample(10 - i, MetricKind::Cpu, i as f64, &format!("t{}", 10 - i)))
            .collect();
        let trend = project_trend(&metrics, 2);
        // The two newest samples, reversed into chronological order.
        assert_eq!(trend.cpu, vec![Some(1.0), Some(0.0)]);
        assert_eq!(trend.labels, vec!["t9", "t10"]);
    }

    #[test]
    fn memory_only_input_uses_memory_timestamps() {
        let metrics = vec![
            sample(2, MetricKind::Memory, 55.0, "t2"),
            sample(1, MetricKind::Memory, 50.0, "t1"),
        ];
        let trend = project_trend(&metrics, TREND_WINDOW);
        assert_eq!(trend.labels, vec!["t1", "t2"]);
        assert_eq!(trend.cpu, vec![None, None]);
        assert_eq!(trend.memory, vec![Some(50.0), Some(55.0)]);
    }

    #[test]
    fn empty_input_projects_empty_series() {
        let trend = project_trend(&[], TREND_WINDOW);
        assert_eq!(trend, TrendSeries::default());
    }

    #[test]
    fn reprojection_is_identical() {
        let metrics = vec![
            sample(2, MetricKind::Cpu, 42.0, "t2"),
            sample(1, MetricKind::Memory, 58.0, "t1"),
        ];
        assert_eq!(
            project_trend(&metrics, TREND_WINDOW),
            project_trend(&metrics, TREND_WINDOW)
        );
    }
}
