use ahash::AHashMap;

use crate::error::NodeFault;
use crate::formula;

/// Number of months simulated for compounding assets and goal outputs.
pub const PROJECTION_MONTHS: usize = 120;

/// Input port receiving the right operand of a subtract or divide node. The
/// left operand collects every other edge, named port `a` or not.
pub(crate) const PORT_B: &str = "b";

/// One resolved incoming edge, as seen by the node under evaluation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Inbound<'a> {
    pub source: &'a str,
    pub port: Option<&'a str>,
    pub value: f64,
    pub series: Option<&'a [f64]>,
}

/// A node's computed result: the scalar value plus, for asset and output
/// kinds, the monthly projection series.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KindValue {
    pub value: f64,
    pub series: Option<Vec<f64>>,
}

impl KindValue {
    pub fn scalar(value: f64) -> Self {
        Self {
            value,
            series: None,
        }
    }
}

/// Evaluates a calc node: inbound values become formula variables keyed by
/// source node id, with several edges from the same source summing into one
/// binding.
pub(crate) fn evaluate_calc(
    formula: Option<&str>,
    inbound: &[Inbound],
) -> Result<KindValue, NodeFault> {
    let formula = formula.ok_or(NodeFault::MissingFormula)?;

    let mut variables: AHashMap<String, f64> = AHashMap::new();
    for edge in inbound {
        *variables.entry(edge.source.to_string()).or_insert(0.0) += edge.value;
    }

    let value = formula::evaluate(formula, &variables)?;
    Ok(KindValue::scalar(value))
}

/// Evaluates an asset node: the monthly contribution is the sum of all
/// inbound values, and the balance compounds at the monthly rate over the
/// projection window, starting from zero.
pub(crate) fn evaluate_asset(
    interest_rate_annual: Option<f64>,
    inbound: &[Inbound],
) -> Result<KindValue, NodeFault> {
    let annual_rate = interest_rate_annual.ok_or(NodeFault::MissingInterestRate)?;
    let monthly_rate = annual_rate / 12.0;
    let contribution: f64 = inbound.iter().map(|edge| edge.value).sum();

    let mut series = Vec::with_capacity(PROJECTION_MONTHS);
    let mut balance = 0.0;
    for _ in 0..PROJECTION_MONTHS {
        balance = balance * (1.0 + monthly_rate) + contribution;
        series.push(balance);
    }

    Ok(KindValue {
        value: balance,
        series: Some(series),
    })
}

/// Evaluates an output node: inbound series are summed element-wise and the
/// value is the 1-based first month at which the combined balance reaches the
/// target, or -1 when it never does. Inbound edges without a series are
/// skipped; having none at all is a fault.
pub(crate) fn evaluate_output(
    target_amount: Option<f64>,
    inbound: &[Inbound],
) -> Result<KindValue, NodeFault> {
    let target = target_amount.ok_or(NodeFault::MissingTargetAmount)?;

    let mut combined: Option<Vec<f64>> = None;
    for series in inbound.iter().filter_map(|edge| edge.series) {
        let acc = combined.get_or_insert_with(|| vec![0.0; series.len()]);
        if acc.len() < series.len() {
            acc.resize(series.len(), 0.0);
        }
        for (slot, value) in acc.iter_mut().zip(series) {
            *slot += value;
        }
    }
    let combined = combined.ok_or(NodeFault::MissingAssetSeries)?;

    let value = match combined.iter().position(|&balance| balance >= target) {
        Some(index) => (index + 1) as f64,
        None => -1.0,
    };

    Ok(KindValue {
        value,
        series: Some(combined),
    })
}

/// Resolves the two named operands of a subtract or divide node. Edges route
/// to `a` unless they name port `b`; several edges on the same port sum.
pub(crate) fn two_port_operands(inbound: &[Inbound]) -> (f64, f64) {
    let mut a = 0.0;
    let mut b = 0.0;
    for edge in inbound {
        match edge.port {
            Some(PORT_B) => b += edge.value,
            _ => a += edge.value,
        }
    }
    (a, b)
}
