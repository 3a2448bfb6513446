/// Per-object shader attributes resolved from custom properties.
///
/// Requests named `object:<prop>` read the instanced object and its data;
/// `instancer:<prop>` first tries the generating particle settings and the
/// duplicator. Other names are geometry attributes and are left to the
/// geometry converter.

use glam::Vec4;
use crate::provider::{lookup_property, DataId, InstanceRecord, ObjectInfo, PropertyResolver};
use crate::scene::{AttributeRequestSet, Object, ParamValue};

const OBJECT_PREFIX: &str = "object:";
const INSTANCER_PREFIX: &str = "instancer:";

/// Where an attribute request is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeScope {
    Geometry,
    Object,
    Instancer,
}

/// Split a request name into its scope and property name
pub fn split_attribute_name(name: &str) -> (AttributeScope, &str) {
    if let Some(rest) = name.strip_prefix(OBJECT_PREFIX) {
        (AttributeScope::Object, rest)
    } else if let Some(rest) = name.strip_prefix(INSTANCER_PREFIX) {
        (AttributeScope::Instancer, rest)
    } else {
        (AttributeScope::Geometry, name)
    }
}

/// Resolve a property for an instance, zero when nothing matches.
///
/// Each level is tried as custom property `["name"]` then as plain `name`.
pub fn lookup_instance_property<R: PropertyResolver + ?Sized>(
    resolver: &R,
    record: &InstanceRecord,
    object: &ObjectInfo,
    name: &str,
    use_instancer: bool,
) -> Vec4 {
    let idprop_name = format!("[\"{}\"]", name);
    let lookup = |id: DataId| {
        lookup_property(resolver, id, &idprop_name).or_else(|| lookup_property(resolver, id, name))
    };

    if use_instancer && record.is_instance() {
        let instancer_chain = record
            .particle_system
            .map(|psys| psys.settings)
            .into_iter()
            .chain(record.parent);
        for id in instancer_chain {
            if let Some(value) = lookup(id) {
                return value;
            }
        }
    }

    std::iter::once(object.id)
        .chain(object.data)
        .find_map(|id| lookup(id))
        .unwrap_or(Vec4::ZERO)
}

/// Bring `object.attributes` in line with `requests`.
///
/// Drops attributes no longer requested, then resolves every object or
/// instancer request and inserts or overwrites values whose bytes differ.
/// Returns true when anything changed.
pub fn reconcile_attributes<R: PropertyResolver + ?Sized>(
    resolver: &R,
    record: &InstanceRecord,
    info: &ObjectInfo,
    requests: &AttributeRequestSet,
    object: &mut Object,
) -> bool {
    let before = object.attributes.len();
    object.attributes.retain(|param| requests.find(&param.name));
    let mut changed = object.attributes.len() != before;

    for name in requests.names() {
        let (scope, real_name) = split_attribute_name(name);
        if scope == AttributeScope::Geometry {
            continue;
        }

        let value = lookup_instance_property(resolver, record, info, real_name, scope == AttributeScope::Instancer);
        let param = ParamValue::new(name, value);

        match object.attributes.iter_mut().find(|existing| existing.name == name) {
            None => {
                object.attributes.push(param);
                changed = true;
            }
            Some(existing) if existing.bytes() != param.bytes() => {
                *existing = param;
                changed = true;
            }
            Some(_) => {}
        }
    }

    if changed {
        object.mark_attributes_changed();
    }
    changed
}

#[cfg(test)]
#[path = "attributes_tests.rs"]
mod tests;
