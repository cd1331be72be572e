//! The runtime context: one heap plus shared, immutable built-ins.

use std::sync::Arc;

use tern_core::{EventChannel, Heap, ObjectId, ObjectKind, TableIndex, Value, ValueKind};
use tern_symbols::{ArgSpec, CallKind, SymbolImage};

use crate::config::RuntimeConfig;
use crate::error::{CallError, RuntimeError};
use crate::hooks::{CharDispatch, Hooks, ScriptHost};
use crate::instances::Instantiations;
use crate::modules::{BOOT_SCRIPT, ModuleCatalog};
use crate::natives::{NativeTable, invoke};
use crate::registry::ClassRegistry;
use crate::resolve::{PrototypeChainResolver, Resolution};
use crate::trace::{NoopTracer, Tracer};

const PROTO: &str = "__proto__";

/// Everything a build knows about its built-ins. Immutable once built and
/// shared by every runtime over the same image.
#[derive(Debug)]
pub struct Builtins {
    image: SymbolImage,
    registry: ClassRegistry,
    natives: NativeTable,
    modules: ModuleCatalog,
}

impl Builtins {
    /// Bundle the parts, checking that every callable entry is bound to a
    /// registered native and every table member names a real table.
    pub fn new(
        image: SymbolImage,
        registry: ClassRegistry,
        natives: NativeTable,
        modules: ModuleCatalog,
    ) -> Result<Self, RuntimeError> {
        for table in image.tables().iter() {
            for (name, entry) in table.iter() {
                match entry.spec.call_kind() {
                    CallKind::SymbolTable => {
                        let target = entry
                            .table()
                            .filter(|t| t.as_usize() < image.table_count());
                        if target.is_none() {
                            return Err(RuntimeError::UnknownTable(TableIndex(
                                entry.target.min(u16::MAX as u32) as u16,
                            )));
                        }
                    }
                    CallKind::Function | CallKind::ExecuteImmediately => {
                        if natives.get(entry.function()).is_none() {
                            return Err(RuntimeError::UnboundFunction {
                                table: table.name(),
                                name,
                                function: entry.function(),
                            });
                        }
                    }
                }
            }
        }
        Ok(Self {
            image,
            registry,
            natives,
            modules,
        })
    }

    pub fn image(&self) -> &SymbolImage {
        &self.image
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn natives(&self) -> &NativeTable {
        &self.natives
    }

    pub fn modules(&self) -> &ModuleCatalog {
        &self.modules
    }
}

/// Result of a module lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResolvedModule<'a> {
    /// Native library object, owned by the caller.
    Native(Value),
    /// Source of a bundled script.
    Script(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    HardwareReady,
    Running,
    Stopped,
}

pub struct Runtime {
    builtins: Arc<Builtins>,
    heap: Heap,
    instances: Arc<Instantiations>,
    hooks: Hooks,
    chars: CharDispatch,
    config: RuntimeConfig,
    state: Lifecycle,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("state", &self.state)
            .field("heap", &self.heap)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl Runtime {
    pub fn new(builtins: Arc<Builtins>, hooks: Hooks, config: RuntimeConfig) -> Self {
        let instances = Arc::new(Instantiations::new(builtins.image.table_count()));
        let mut heap = Heap::new(config.heap_capacity);
        heap.set_observer(instances.clone());
        let chars = hooks.char_dispatch();
        Self {
            builtins,
            heap,
            instances,
            hooks,
            chars,
            config,
            state: Lifecycle::Created,
        }
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn global(&self) -> Value {
        Value::Ref(self.heap.root())
    }

    // Resolution

    pub fn resolver(&self) -> PrototypeChainResolver<'_> {
        PrototypeChainResolver::new(&self.builtins.image, &self.builtins.registry)
            .max_depth(self.config.max_prototype_depth)
    }

    pub fn resolve_member(&self, class_name: &str, name: &str) -> Option<Resolution> {
        self.resolver().resolve_member(class_name, name)
    }

    pub fn is_builtin_class_name(&self, name: &str) -> bool {
        self.builtins.registry.is_builtin_class_name(name)
    }

    pub fn basic_class_name_of(&self, value: Value) -> Option<&str> {
        self.builtins
            .registry
            .basic_class_name_of(self.heap.kind(value))
    }

    pub fn basic_prototype_name(&self, name: &str) -> Option<&str> {
        self.builtins.registry.basic_prototype_name(name)
    }

    pub fn find_member(&self, value: Value, name: &str) -> Option<Resolution> {
        self.find_member_traced(value, name, &mut NoopTracer)
    }

    /// Resolve `name` on `value`: the global table for the root object,
    /// the tagged table for native objects, the representation class for
    /// everything else.
    pub fn find_member_traced<T: Tracer>(
        &self,
        value: Value,
        name: &str,
        tracer: &mut T,
    ) -> Option<Resolution> {
        let registry = &self.builtins.registry;
        let (own, prototype) = match self.heap.kind(value) {
            ValueKind::Undefined | ValueKind::Null => return None,
            ValueKind::Root => (registry.global_table(), None),
            ValueKind::NativeObject(table) => {
                let prototype = registry
                    .class_for_table(table)
                    .and_then(|id| registry.class(id).prototype());
                (Some(table), prototype)
            }
            kind => match registry.basic_class_of(kind) {
                Some(id) => {
                    let class = registry.class(id);
                    (class.own_table(), class.prototype())
                }
                None => (None, None),
            },
        };
        self.resolver().resolve_from(own, prototype, name, tracer)
    }

    /// Turn a resolved entry into a value owned by the caller.
    pub fn materialize(&mut self, resolution: Resolution, this: Value) -> Result<Value, RuntimeError> {
        let entry = resolution.entry;
        match entry.spec.call_kind() {
            CallKind::SymbolTable => {
                let table = entry.table().ok_or(RuntimeError::UnknownTable(TableIndex(
                    entry.target.min(u16::MAX as u32) as u16,
                )))?;
                self.create_from_table_index(table)
            }
            CallKind::ExecuteImmediately => Ok(invoke(
                &mut self.heap,
                &self.builtins.natives,
                entry.function(),
                entry.spec,
                this,
                &[],
            )?),
            CallKind::Function => {
                let id = self
                    .heap
                    .new_native_function(entry.function(), entry.spec.bits())?;
                Ok(Value::Ref(id))
            }
        }
    }

    /// Prototype table of a value of a basic class: the class's own table,
    /// or the first table up its prototype chain. The root object and
    /// native objects have none.
    pub fn prototype_table(&self, value: Value) -> Option<TableIndex> {
        let registry = &self.builtins.registry;
        let kind = self.heap.kind(value);
        if matches!(
            kind,
            ValueKind::Undefined | ValueKind::Null | ValueKind::Root | ValueKind::NativeObject(_)
        ) {
            return None;
        }
        let mut next = registry.basic_class_of(kind);
        for _ in 0..=self.config.max_prototype_depth {
            let class = registry.class(next?);
            if let Some(table) = class.own_table() {
                return Some(table);
            }
            next = class.prototype();
        }
        None
    }

    /// Built-in member, then dynamic field, then `Undefined`. The result is
    /// owned by the caller.
    ///
    /// `__proto__` on a value of a basic class is the native object of its
    /// prototype table.
    pub fn get_property(&mut self, value: Value, name: &str) -> Result<Value, RuntimeError> {
        if name == PROTO
            && let Some(table) = self.prototype_table(value)
        {
            return self.create_from_table_index(table);
        }
        if let Some(resolution) = self.find_member(value, name) {
            return self.materialize(resolution, value);
        }
        if let Value::Ref(id) = value
            && let Some(field) = self.heap.field(id, name)
        {
            self.heap.retain_value(field);
            return Ok(field);
        }
        Ok(Value::Undefined)
    }

    /// Call a native function value. Borrows every argument.
    pub fn call(&mut self, function: Value, this: Value, args: &[Value]) -> Result<Value, RuntimeError> {
        let (id, spec) = function
            .as_object()
            .and_then(|id| self.heap.get(id))
            .and_then(|object| match object.kind() {
                ObjectKind::NativeFunction { function, spec } => Some((*function, *spec)),
                _ => None,
            })
            .ok_or(CallError::NotCallable)?;
        Ok(invoke(
            &mut self.heap,
            &self.builtins.natives,
            id,
            ArgSpec::from_bits(spec),
            this,
            args,
        )?)
    }

    pub fn release(&mut self, value: Value) {
        self.heap.release_value(value);
    }

    // Native objects

    /// Native object for `table`: the live instance if one exists,
    /// otherwise a fresh tagged object. Owned by the caller either way.
    pub fn create_from_table_index(&mut self, table: TableIndex) -> Result<Value, RuntimeError> {
        if table.as_usize() >= self.builtins.image.table_count() {
            return Err(RuntimeError::UnknownTable(table));
        }
        if let Some(id) = self.instances.get(table) {
            if self.heap.native_tag(id) == Some(table) {
                self.heap.retain(id)?;
                return Ok(Value::Ref(id));
            }
            log::warn!("stale native object entry for table {table}");
            self.instances.clear_if(table, id);
        }
        let id = self.heap.new_object()?;
        self.heap.set_native_tag(id, table)?;
        self.instances.record(table, id);
        log::debug!("created native object for table {table}");
        Ok(Value::Ref(id))
    }

    /// Live native object registered for `table`.
    pub fn instantiation(&self, table: TableIndex) -> Option<ObjectId> {
        self.instances.get(table)
    }

    pub fn instantiations(&self) -> &Arc<Instantiations> {
        &self.instances
    }

    // Modules

    /// Native library first, then bundled script. `_` never resolves.
    pub fn resolve_module(&mut self, name: &str) -> Result<Option<ResolvedModule<'_>>, RuntimeError> {
        if name == BOOT_SCRIPT {
            return Ok(None);
        }
        if let Some(table) = self.builtins.modules.library(name) {
            let value = self.create_from_table_index(table)?;
            return Ok(Some(ResolvedModule::Native(value)));
        }
        Ok(self
            .builtins
            .modules
            .script(name)
            .map(ResolvedModule::Script))
    }

    pub fn list_loadable_module_names(&self) -> String {
        self.builtins.modules.list_names()
    }

    // Lifecycle

    /// Run hardware-init hooks. Only the first call does anything.
    pub fn hw_init(&mut self) -> bool {
        if self.state != Lifecycle::Created {
            log::warn!("hardware init requested twice");
            return false;
        }
        for hook in &self.hooks.hw_init {
            hook();
        }
        self.state = Lifecycle::HardwareReady;
        log::debug!("hardware initialized ({} hooks)", self.hooks.hw_init.len());
        true
    }

    /// Bring the engine up: restore native-object registrations from the
    /// heap, run the startup script, then the init hooks.
    pub fn init(&mut self, host: &mut dyn ScriptHost) -> Result<(), RuntimeError> {
        match self.state {
            Lifecycle::Created => return Err(RuntimeError::HardwareNotInitialized),
            Lifecycle::Running => return Err(RuntimeError::AlreadyRunning),
            Lifecycle::HardwareReady | Lifecycle::Stopped => {}
        }
        self.rescan_instances();
        self.state = Lifecycle::Running;

        if self.config.run_boot_script {
            let builtins = Arc::clone(&self.builtins);
            if let Some(source) = builtins.modules.boot_script() {
                log::debug!("running startup script");
                host.evaluate(self, BOOT_SCRIPT, source);
            }
        }

        let mut hooks = std::mem::take(&mut self.hooks.init);
        for hook in hooks.iter_mut() {
            hook(self);
        }
        self.hooks.init = hooks;
        log::debug!("engine initialized");
        Ok(())
    }

    fn rescan_instances(&mut self) {
        self.instances.reset();
        for (id, object) in self.heap.iter() {
            let Some(table) = object.native_tag() else {
                continue;
            };
            if self.instances.get(table).is_some() {
                log::warn!("more than one native object for table {table}");
                continue;
            }
            self.instances.record(table, id);
        }
    }

    /// Run kill hooks and forget every native object registration.
    pub fn kill(&mut self) {
        if self.state != Lifecycle::Running {
            log::warn!("engine deinit while not running");
            return;
        }
        let mut hooks = std::mem::take(&mut self.hooks.kill);
        for hook in hooks.iter_mut() {
            hook(self);
        }
        self.hooks.kill = hooks;
        self.instances.reset();
        self.state = Lifecycle::Stopped;
        log::debug!("engine stopped");
    }

    /// Run every idle hook. `true` if any of them has more work.
    pub fn idle(&mut self) -> bool {
        let mut hooks = std::mem::take(&mut self.hooks.idle);
        let mut busy = false;
        for hook in hooks.iter_mut() {
            busy |= hook(self);
        }
        self.hooks.idle = hooks;
        busy
    }

    /// Dispatcher to hand to interrupt handlers.
    pub fn char_dispatch(&self) -> CharDispatch {
        self.chars.clone()
    }

    pub fn on_char_event(&self, channel: EventChannel, byte: u8) -> bool {
        self.chars.on_char_event(channel, byte)
    }
}
