use std::collections::HashMap;

use crate::ContainerId;
use crate::ValidatedModel;

/// All validated members of one container, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerGroup {
	pub id: ContainerId,
	pub members: Vec<ValidatedModel>,
}

/// Group models by `(namespace, container name)`.
///
/// Groups appear in the order their first member was discovered and members
/// keep their relative order. The container kind is taken from the first
/// member; a later member that disagrees is kept but logged.
pub fn group_models(models: impl IntoIterator<Item = ValidatedModel>) -> Vec<ContainerGroup> {
	let mut groups: Vec<ContainerGroup> = Vec::new();
	let mut index: HashMap<(String, String), usize> = HashMap::new();

	for model in models {
		let key = (model.namespace.clone(), model.container_name.clone());
		if let Some(&position) = index.get(&key) {
			let group = &mut groups[position];
			if group.id.kind != model.container_kind {
				tracing::warn!(
					namespace = %model.namespace,
					container = %model.container_name,
					member = %model.member_name,
					"container kind disagrees with earlier members; keeping `{}`",
					group.id.kind.keyword()
				);
			}
			group.members.push(model);
			continue;
		}

		index.insert(key, groups.len());
		groups.push(ContainerGroup {
			id: ContainerId::new(
				model.namespace.clone(),
				model.container_name.clone(),
				model.container_kind,
			),
			members: vec![model],
		});
	}

	groups
}
