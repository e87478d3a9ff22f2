//! Depth-ordered batch planning.
//!
//! `depth(loader)` is 0 without dependencies, otherwise one past the
//! deepest dependency. Loaders of equal depth form one batch; batches are
//! ordered ascending, so every loader depends only on strictly earlier
//! batches. Cycles and unknown names are fatal: planning fails immediately
//! rather than guessing a depth.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::PlanError;
use crate::loader::LoaderDef;

/// Ordered batches of loaders with equal dependency depth.
#[derive(Debug, Default)]
pub struct BatchPlan {
	batches: Vec<Vec<Arc<LoaderDef>>>,
}

impl BatchPlan {
	/// The batches, shallowest first.
	pub fn batches(&self) -> &[Vec<Arc<LoaderDef>>] {
		&self.batches
	}

	/// Number of batches.
	pub fn len(&self) -> usize {
		self.batches.len()
	}

	/// Whether the plan holds no loaders at all.
	pub fn is_empty(&self) -> bool {
		self.batches.is_empty()
	}
}

/// Plans the loaders of one route into depth-ordered batches.
///
/// Order within a batch follows registration order, so execution is
/// deterministic for a given loader set.
pub fn plan_batches(loaders: &[Arc<LoaderDef>]) -> Result<BatchPlan, PlanError> {
	let by_name: FxHashMap<&'static str, &Arc<LoaderDef>> =
		loaders.iter().map(|loader| (loader.name(), loader)).collect();

	let mut depths: FxHashMap<&'static str, usize> = FxHashMap::default();
	let mut visiting: Vec<&'static str> = Vec::new();
	for loader in loaders {
		depth_of(loader.name(), &by_name, &mut depths, &mut visiting)?;
	}

	let mut batches: Vec<Vec<Arc<LoaderDef>>> = Vec::new();
	for loader in loaders {
		let depth = depths.get(loader.name()).copied().unwrap_or(0);
		if batches.len() <= depth {
			batches.resize_with(depth + 1, Vec::new);
		}
		batches[depth].push(loader.clone());
	}
	Ok(BatchPlan { batches })
}

fn depth_of(
	name: &'static str,
	by_name: &FxHashMap<&'static str, &Arc<LoaderDef>>,
	depths: &mut FxHashMap<&'static str, usize>,
	visiting: &mut Vec<&'static str>,
) -> Result<usize, PlanError> {
	if let Some(&depth) = depths.get(name) {
		return Ok(depth);
	}
	if visiting.contains(&name) {
		return Err(PlanError::CyclicDependency { name });
	}
	let Some(loader) = by_name.get(name) else {
		// Callers verify presence before recursing; nothing to compute.
		return Ok(0);
	};
	visiting.push(name);
	let mut depth = 0;
	for dep in loader.dependencies().iter().copied() {
		if !by_name.contains_key(dep) {
			return Err(PlanError::MissingDependency { loader: name, missing: dep });
		}
		depth = depth.max(1 + depth_of(dep, by_name, depths, visiting)?);
	}
	visiting.pop();
	depths.insert(name, depth);
	Ok(depth)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn loader(name: &'static str, deps: &[&'static str]) -> Arc<LoaderDef> {
		Arc::new(
			LoaderDef::new(name, "r", |_ctx| async { Ok(json!(null)) })
				.depends_on(deps.iter().copied().collect::<Vec<_>>()),
		)
	}

	fn names(plan: &BatchPlan) -> Vec<Vec<&'static str>> {
		plan.batches()
			.iter()
			.map(|batch| batch.iter().map(|l| l.name()).collect())
			.collect()
	}

	#[test]
	fn independent_loaders_form_one_batch() {
		let plan = plan_batches(&[loader("a", &[]), loader("b", &[])]).unwrap();
		assert_eq!(names(&plan), vec![vec!["a", "b"]]);
	}

	#[test]
	fn fan_out_from_one_root() {
		let plan =
			plan_batches(&[loader("a", &[]), loader("b", &["a"]), loader("c", &["a"])]).unwrap();
		assert_eq!(names(&plan), vec![vec!["a"], vec!["b", "c"]]);
	}

	#[test]
	fn diamond_orders_by_depth() {
		let plan = plan_batches(&[
			loader("a", &[]),
			loader("b", &["a"]),
			loader("c", &["a"]),
			loader("d", &["b", "c"]),
		])
		.unwrap();
		assert_eq!(names(&plan), vec![vec!["a"], vec!["b", "c"], vec!["d"]]);
	}

	#[test]
	fn registration_order_is_kept_within_a_batch() {
		let plan = plan_batches(&[loader("z", &[]), loader("a", &[]), loader("m", &[])]).unwrap();
		assert_eq!(names(&plan), vec![vec!["z", "a", "m"]]);
	}

	#[test]
	fn two_loader_cycle_fails_fast() {
		let err = plan_batches(&[loader("a", &["b"]), loader("b", &["a"])]).unwrap_err();
		assert!(matches!(err, PlanError::CyclicDependency { .. }));
	}

	#[test]
	fn self_dependency_is_a_cycle() {
		let err = plan_batches(&[loader("a", &["a"])]).unwrap_err();
		assert_eq!(err, PlanError::CyclicDependency { name: "a" });
	}

	#[test]
	fn missing_dependency_names_both_sides() {
		let err = plan_batches(&[loader("a", &["ghost"])]).unwrap_err();
		assert_eq!(err, PlanError::MissingDependency { loader: "a", missing: "ghost" });
	}

	#[test]
	fn long_chain_does_not_overflow() {
		// 500 loaders in one chain; recursion depth equals chain length.
		let loaders: Vec<Arc<LoaderDef>> = (0..500)
			.map(|i| {
				let name: &'static str = Box::leak(format!("l{i}").into_boxed_str());
				let deps: Vec<&'static str> = if i == 0 {
					Vec::new()
				} else {
					vec![Box::leak(format!("l{}", i - 1).into_boxed_str()) as &'static str]
				};
				Arc::new(
					LoaderDef::new(name, "r", |_ctx| async { Ok(json!(null)) }).depends_on(deps),
				)
			})
			.collect();
		let plan = plan_batches(&loaders).unwrap();
		assert_eq!(plan.len(), 500);
	}
}
