//! Single inheritance by delegation.
//!
//! A [`Class`] owns a method table and may link to a parent class. Method
//! lookups walk the chain child-first, so a child's own entries shadow the
//! parent's without touching it. Linking never runs the parent constructor.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub type Method = Rc<dyn Fn(&mut Instance, &[Value]) -> Result<Value>>;
pub type Constructor = Rc<dyn Fn(&mut Instance, &[Value]) -> Result<()>>;
pub type Methods = BTreeMap<String, Method>;

/// Wrap a closure as a [`Method`].
pub fn method<F>(f: F) -> Method
where
    F: Fn(&mut Instance, &[Value]) -> Result<Value> + 'static,
{
    Rc::new(f)
}

pub struct Class {
    name: String,
    constructor: Option<Constructor>,
    methods: RefCell<Methods>,
    parent: RefCell<Option<Rc<Class>>>,
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("methods", &self.methods.borrow().keys().collect::<Vec<_>>())
            .field("parent", &self.super_class().map(|p| p.name.clone()))
            .finish()
    }
}

impl Class {
    pub fn new<F>(name: impl Into<String>, constructor: F) -> Rc<Self>
    where
        F: Fn(&mut Instance, &[Value]) -> Result<()> + 'static,
    {
        Rc::new(Self {
            name: name.into(),
            constructor: Some(Rc::new(constructor)),
            methods: RefCell::new(Methods::new()),
            parent: RefCell::new(None),
        })
    }

    /// A class that only carries methods and cannot be instantiated or linked.
    pub fn without_constructor(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            constructor: None,
            methods: RefCell::new(Methods::new()),
            parent: RefCell::new(None),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_callable(&self) -> bool {
        self.constructor.is_some()
    }

    pub fn define<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&mut Instance, &[Value]) -> Result<Value> + 'static,
    {
        self.methods.borrow_mut().insert(name.into(), method(f));
    }

    pub fn super_class(&self) -> Option<Rc<Class>> {
        self.parent.borrow().clone()
    }

    /// Resolve a method on this class or the nearest ancestor defining it.
    pub fn lookup(&self, name: &str) -> Option<Method> {
        if let Some(found) = self.methods.borrow().get(name) {
            return Some(Rc::clone(found));
        }
        self.super_class().and_then(|parent| parent.lookup(name))
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// True if `ancestor` is this class or appears in its parent chain.
    pub fn is_subclass_of(&self, ancestor: &Class) -> bool {
        if std::ptr::eq(self, ancestor) {
            return true;
        }
        self.super_class()
            .map(|parent| parent.is_subclass_of(ancestor))
            .unwrap_or(false)
    }

    pub fn construct(self: &Rc<Self>, args: &[Value]) -> Result<Instance> {
        let constructor = self
            .constructor
            .clone()
            .ok_or_else(|| Error::inherit_invalid_callable(&self.name))?;

        let mut instance = Instance {
            class: Rc::clone(self),
            fields: Map::new(),
        };
        constructor(&mut instance, args)?;
        Ok(instance)
    }

    /// Invoke `name` resolved from this class rather than the instance's own
    /// class; used for explicit super calls.
    pub fn invoke(&self, instance: &mut Instance, name: &str, args: &[Value]) -> Result<Value> {
        let found = self
            .lookup(name)
            .ok_or_else(|| Error::inherit_method_not_found(&self.name, name))?;
        found(instance, args)
    }
}

#[derive(Debug)]
pub struct Instance {
    class: Rc<Class>,
    pub fields: Map<String, Value>,
}

impl Instance {
    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class.is_subclass_of(class)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let class = Rc::clone(&self.class);
        class.invoke(self, name, args)
    }
}

/// Make `child` inherit from `parent`, then copy `overrides` onto `child`.
///
/// Both classes must have a constructor, and `child` must not already be an
/// ancestor of `parent`.
pub fn inherit(child: &Rc<Class>, parent: &Rc<Class>, overrides: Option<Methods>) -> Result<()> {
    if !parent.is_callable() {
        return Err(Error::inherit_invalid_callable(&parent.name));
    }
    if !child.is_callable() {
        return Err(Error::inherit_invalid_callable(&child.name));
    }
    if parent.is_subclass_of(child) {
        return Err(Error::inherit_cycle(&child.name, &parent.name));
    }

    *child.parent.borrow_mut() = Some(Rc::clone(parent));

    if let Some(overrides) = overrides {
        child.methods.borrow_mut().extend(overrides);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn animal() -> Rc<Class> {
        let class = Class::new("Animal", |this, args| {
            this.set("name", args.first().cloned().unwrap_or(Value::Null));
            Ok(())
        });
        class.define("speak", |_, _| Ok(json!("...")));
        class.define("describe", |this, _| {
            let name = this
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("?")
                .to_string();
            let sound = this.call("speak", &[])?;
            Ok(json!(format!("{} says {}", name, sound.as_str().unwrap_or(""))))
        });
        class
    }

    fn dog() -> Rc<Class> {
        Class::new("Dog", |this, args| {
            this.set("name", args.first().cloned().unwrap_or(Value::Null));
            this.set("tricks", json!([]));
            Ok(())
        })
    }

    #[test]
    fn child_instances_are_parent_instances() {
        let (animal, dog) = (animal(), dog());
        inherit(&dog, &animal, None).unwrap();

        let rex = dog.construct(&[json!("Rex")]).unwrap();
        assert_eq!(rex.class().name(), "Dog");
        assert!(rex.is_instance_of(&dog));
        assert!(rex.is_instance_of(&animal));
        assert!(dog.responds_to("describe"));
        assert!(Rc::ptr_eq(&dog.super_class().unwrap(), &animal));
    }

    #[test]
    fn parent_instances_are_not_child_instances() {
        let (animal, dog) = (animal(), dog());
        inherit(&dog, &animal, None).unwrap();
        let generic = animal.construct(&[json!("Generic")]).unwrap();
        assert!(!generic.is_instance_of(&dog));
    }

    #[test]
    fn overrides_shadow_without_touching_parent() {
        let (animal, dog) = (animal(), dog());
        let mut overrides = Methods::new();
        overrides.insert("speak".to_string(), method(|_, _| Ok(json!("woof"))));
        inherit(&dog, &animal, Some(overrides)).unwrap();

        let mut rex = dog.construct(&[json!("Rex")]).unwrap();
        let mut cat = animal.construct(&[json!("Tom")]).unwrap();

        assert_eq!(rex.call("describe", &[]).unwrap(), json!("Rex says woof"));
        assert_eq!(cat.call("describe", &[]).unwrap(), json!("Tom says ..."));
    }

    #[test]
    fn super_calls_resolve_from_parent() {
        let (animal, dog) = (animal(), dog());
        inherit(&dog, &animal, None).unwrap();
        dog.define("speak", |_, _| Ok(json!("woof")));

        let mut rex = dog.construct(&[json!("Rex")]).unwrap();
        let parent = dog.super_class().unwrap();
        assert_eq!(parent.invoke(&mut rex, "speak", &[]).unwrap(), json!("..."));
        assert_eq!(rex.call("speak", &[]).unwrap(), json!("woof"));
    }

    #[test]
    fn linking_does_not_run_parent_constructor() {
        let (animal, dog) = (animal(), dog());
        inherit(&dog, &animal, None).unwrap();
        let rex = dog.construct(&[json!("Rex")]).unwrap();
        assert_eq!(rex.get("tricks"), Some(&json!([])));
    }

    #[test]
    fn rejects_classes_without_constructor() {
        let mixin = Class::without_constructor("Mixin");
        let err = inherit(&dog(), &mixin, None).unwrap_err();
        assert_eq!(err.code.as_str(), "inherit.invalid_callable");
        assert_eq!(err.details["class"], "Mixin");

        let err = inherit(&mixin, &animal(), None).unwrap_err();
        assert_eq!(err.code.as_str(), "inherit.invalid_callable");
        assert!(mixin.construct(&[]).is_err());
    }

    #[test]
    fn rejects_cycles() {
        let (animal, dog) = (animal(), dog());
        inherit(&dog, &animal, None).unwrap();
        let err = inherit(&animal, &dog, None).unwrap_err();
        assert_eq!(err.code.as_str(), "inherit.cycle");
        assert!(inherit(&dog, &dog, None).is_err());
    }

    #[test]
    fn unknown_method_is_an_error() {
        let mut rex = dog().construct(&[]).unwrap();
        let err = rex.call("fetch", &[]).unwrap_err();
        assert_eq!(err.code.as_str(), "inherit.method_not_found");
    }
}
