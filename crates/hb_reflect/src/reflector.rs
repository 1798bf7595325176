use alloc::boxed::Box;
use core::fmt;

use crate::convert::{Env, Populator, Serializer};
use crate::error::ReflectError;
use crate::info::{TypeInfo, Typed};
use crate::logs::{LogSink, Logs};
use crate::node::SerializedNode;
use crate::object::Instance;
use crate::options::CodecOptions;
use crate::reflection::Reflect;
use crate::refs::{DeserializationContext, HostHooks, NoHooks};
use crate::registry::{ConverterRegistry, TypeRegistry};
use crate::thread::MainThread;

// -----------------------------------------------------------------------------
// PopulateReport

/// Outcome of a populate call: the success flag and the ordered log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub success: bool,
    pub logs: Logs,
}

impl PopulateReport {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<(bool, Logs)> for PopulateReport {
    #[inline]
    fn from((success, logs): (bool, Logs)) -> Self {
        Self { success, logs }
    }
}

impl fmt::Display for PopulateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", if self.success { "success" } else { "failure" })?;
        fmt::Display::fmt(&self.logs, f)
    }
}

// -----------------------------------------------------------------------------
// Reflector

/// Entry point of the codec.
///
/// Owns the converter and type registries, the host hooks, the log sink and
/// the options. Configure it once at startup, then call it from the main
/// thread: every call takes the [`MainThread`] token.
///
/// # Examples
///
/// ```
/// use hb_reflect::{MainThread, Reflector};
/// use hb_reflect::refs::NoHooks;
/// use hb_reflect::wire::Vector3;
///
/// let main = MainThread::current();
/// let reflector = Reflector::new(NoHooks);
///
/// let node = reflector.serialize(&main, &Vector3::new(1.0, f32::INFINITY, 0.5), "pos", true).unwrap();
/// assert_eq!(node.value, Some(serde_json::json!({"x": 1.0, "y": "Infinity", "z": 0.5})));
///
/// let mut target = Vector3::default();
/// let report = reflector.populate(&main, &mut target, &node);
/// assert!(report.is_success());
/// assert_eq!(target.y, f32::INFINITY);
/// ```
pub struct Reflector {
    converters: ConverterRegistry,
    types: TypeRegistry,
    hooks: Box<dyn HostHooks>,
    sink: Option<Box<dyn LogSink>>,
    options: CodecOptions,
}

impl Default for Reflector {
    /// A reflector with default registries and [`NoHooks`].
    fn default() -> Self {
        Self::new(NoHooks)
    }
}

impl Reflector {
    /// Creates a reflector with the default registries and options.
    pub fn new(hooks: impl HostHooks + 'static) -> Self {
        Self {
            converters: ConverterRegistry::new(),
            types: TypeRegistry::new(),
            hooks: Box::new(hooks),
            sink: None,
            options: CodecOptions::new(),
        }
    }

    #[inline]
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    #[inline]
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    /// Forwards every log entry to `sink` as it is recorded.
    #[inline]
    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[inline]
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers `T` and the types it depends on in the type registry.
    #[inline]
    pub fn register_type<T: Typed>(&mut self) -> &mut Self {
        self.types.register::<T>();
        self
    }

    #[inline]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    #[inline]
    pub fn converters_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.converters
    }

    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[inline]
    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    #[inline]
    pub fn hooks(&self) -> &dyn HostHooks {
        &*self.hooks
    }

    #[inline]
    pub fn options(&self) -> CodecOptions {
        self.options
    }

    fn env(&self) -> Env<'_> {
        Env {
            converters: &self.converters,
            types: &self.types,
            hooks: &*self.hooks,
            options: self.options,
        }
    }

    fn populator<'a>(&'a self, context: &'a mut DeserializationContext) -> Populator<'a> {
        Populator::new(self.env(), context, self.sink.as_deref())
    }

    // -------------------------------------------------------------------------
    // Serialize

    /// Serializes `value` into a node named `name`.
    ///
    /// Without `recursive`, composites keep only their type tag and host
    /// objects only their descriptor.
    pub fn serialize(
        &self,
        thread: &MainThread,
        value: &dyn Reflect,
        name: &str,
        recursive: bool,
    ) -> Result<SerializedNode, ReflectError> {
        thread.assert_current();
        Serializer::new(self.env(), recursive).serialize(value, name)
    }

    /// Serializes a live host object: its descriptor, and its members when
    /// `recursive`.
    pub fn serialize_instance(
        &self,
        thread: &MainThread,
        instance: &Instance,
        name: &str,
        recursive: bool,
    ) -> Result<SerializedNode, ReflectError> {
        thread.assert_current();
        Serializer::new(self.env(), recursive).serialize_instance(instance, name)
    }

    // -------------------------------------------------------------------------
    // Populate

    /// Applies `node` onto `target` with a fresh context.
    pub fn populate(
        &self,
        thread: &MainThread,
        target: &mut dyn Reflect,
        node: &SerializedNode,
    ) -> PopulateReport {
        let mut context = DeserializationContext::new();
        self.populate_with_context(thread, target, node, &mut context)
    }

    /// Applies `node` onto `target`, resolving references through `context`.
    pub fn populate_with_context(
        &self,
        thread: &MainThread,
        target: &mut dyn Reflect,
        node: &SerializedNode,
        context: &mut DeserializationContext,
    ) -> PopulateReport {
        thread.assert_current();
        self.populator(context).populate(target, node).into()
    }

    /// Applies `node` onto a live host object with a fresh context.
    pub fn populate_instance(
        &self,
        thread: &MainThread,
        instance: &Instance,
        node: &SerializedNode,
    ) -> PopulateReport {
        let mut context = DeserializationContext::new();
        self.populate_instance_with_context(thread, instance, node, &mut context)
    }

    pub fn populate_instance_with_context(
        &self,
        thread: &MainThread,
        instance: &Instance,
        node: &SerializedNode,
        context: &mut DeserializationContext,
    ) -> PopulateReport {
        thread.assert_current();
        self.populator(context).populate_instance(instance, node).into()
    }

    /// Populates `target` when it holds a value, otherwise builds one.
    ///
    /// The type of a new value is the one named by the node, or `fallback`.
    pub fn populate_or_create(
        &self,
        thread: &MainThread,
        target: &mut Option<Box<dyn Reflect>>,
        node: &SerializedNode,
        fallback: Option<&'static TypeInfo>,
    ) -> PopulateReport {
        thread.assert_current();
        let mut context = DeserializationContext::new();
        if let Some(value) = target {
            return self.populator(&mut context).populate(&mut **value, node).into();
        }
        match self.populator(&mut context).deserialize(node, fallback) {
            Ok((value, logs)) => {
                *target = Some(value);
                let success = !logs.has_errors();
                PopulateReport { success, logs }
            }
            Err(err) => {
                let mut logs = Logs::new();
                logs.reflect_error(0, &err);
                if let Some(sink) = &self.sink {
                    logs.iter().for_each(|entry| sink.log(entry));
                }
                PopulateReport {
                    success: false,
                    logs,
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Deserialize

    /// Builds a fresh value from `node`.
    ///
    /// The type is the one named by the node when the type registry knows
    /// it, otherwise `fallback`.
    pub fn deserialize(
        &self,
        thread: &MainThread,
        node: &SerializedNode,
        fallback: Option<&'static TypeInfo>,
    ) -> Result<(Box<dyn Reflect>, Logs), ReflectError> {
        let mut context = DeserializationContext::new();
        self.deserialize_with_context(thread, node, fallback, &mut context)
    }

    pub fn deserialize_with_context(
        &self,
        thread: &MainThread,
        node: &SerializedNode,
        fallback: Option<&'static TypeInfo>,
        context: &mut DeserializationContext,
    ) -> Result<(Box<dyn Reflect>, Logs), ReflectError> {
        thread.assert_current();
        self.populator(context).deserialize(node, fallback)
    }

    /// Builds a fresh `T` from `node`.
    pub fn deserialize_as<T: Typed>(
        &self,
        thread: &MainThread,
        node: &SerializedNode,
    ) -> Result<(T, Logs), ReflectError> {
        let (value, logs) = self.deserialize(thread, node, Some(T::type_info()))?;
        match value.take::<T>() {
            Some(value) => Ok((value, logs)),
            None => Err(ReflectError::TypeNotFound {
                type_name: node.type_name.clone(),
            }),
        }
    }
}

impl fmt::Debug for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("converters", &self.converters.len())
            .field("types", &self.types.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
