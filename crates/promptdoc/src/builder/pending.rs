//! Pending-operation log and the special-section registry merged up the
//! builder tree.

use crate::content::Content;
use crate::document::{Paragraph, SpecialKind};
use crate::error::{ConfigError, Result};
use crate::template::TemplateData;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

type Op<T, N> = Box<dyn Fn(&T) -> Result<Vec<N>>>;

/// Ordered log of deferred operations producing nodes of type `N`.
///
/// Each operation yields zero or more nodes; [`resolve`](Self::resolve)
/// runs them in recorded order and concatenates the results, so an
/// operation that yields nothing is dropped and one that yields a sequence
/// is spliced in place.
pub(crate) struct Pending<T, N> {
    ops: Vec<Op<T, N>>,
}

impl<T: 'static, N: 'static> Pending<T, N> {
    pub(crate) fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub(crate) fn push(&mut self, op: impl Fn(&T) -> Result<Vec<N>> + 'static) {
        self.ops.push(Box::new(op));
    }

    /// Record an operation producing at most one node.
    pub(crate) fn push_one(&mut self, op: impl Fn(&T) -> Result<Option<N>> + 'static) {
        self.push(move |data| Ok(op(data)?.into_iter().collect()));
    }

    pub(crate) fn resolve(&self, data: &T) -> Result<Vec<N>> {
        let mut out = Vec::with_capacity(self.ops.len());
        for op in &self.ops {
            out.extend(op(data)?);
        }
        Ok(out)
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }
}

/// Deferred paragraph wrapped into a node by `wrap`.
pub(crate) fn paragraph<T, N>(
    content: Content<T>,
    wrap: fn(Paragraph) -> N,
) -> impl Fn(&T) -> Result<Option<N>> + 'static
where
    T: TemplateData + 'static,
    N: 'static,
{
    move |data: &T| Ok(content.resolve(data)?.map(|text| wrap(Paragraph::new(text))))
}

#[derive(Debug, Default)]
struct Registry {
    memory: bool,
    tools: bool,
    output_specs: bool,
    error: Option<ConfigError>,
}

impl Registry {
    fn taken(&self, kind: SpecialKind) -> bool {
        match kind {
            SpecialKind::Memory => self.memory,
            SpecialKind::Tools => self.tools,
            SpecialKind::OutputSpecs => self.output_specs,
        }
    }

    fn slot(&mut self, kind: SpecialKind) -> &mut bool {
        match kind {
            SpecialKind::Memory => &mut self.memory,
            SpecialKind::Tools => &mut self.tools,
            SpecialKind::OutputSpecs => &mut self.output_specs,
        }
    }
}

/// Registry of one section builder and everything kept beneath it.
///
/// Tracks which special sections have been registered and holds the first
/// configuration error, which every later `build` reports. A child builder
/// starts with its own registry; the parent [`absorb`](Self::absorb)s it
/// only when the branch is kept, so dropped branches claim nothing.
#[derive(Debug, Clone, Default)]
pub(crate) struct Document(Rc<RefCell<Registry>>);

impl Document {
    /// Claim the single `kind` slot of this document.
    pub(crate) fn register(&self, kind: SpecialKind) {
        let taken = {
            let mut registry = self.0.borrow_mut();
            std::mem::replace(registry.slot(kind), true)
        };
        if taken {
            self.fail(ConfigError::DuplicateSpecialSection(kind));
        }
    }

    /// Record a misuse. Only the first error is kept.
    pub(crate) fn fail(&self, error: ConfigError) {
        warn!("prompt builder misuse: {error}");
        let mut registry = self.0.borrow_mut();
        if registry.error.is_none() {
            registry.error = Some(error);
        }
    }

    /// Merge a kept child's registrations and first error into this one.
    pub(crate) fn absorb(&self, child: &Document) {
        if Rc::ptr_eq(&self.0, &child.0) {
            return;
        }
        let (error, kinds) = {
            let child = child.0.borrow();
            let kinds: Vec<SpecialKind> = SpecialKind::ALL
                .into_iter()
                .filter(|kind| child.taken(*kind))
                .collect();
            (child.error.clone(), kinds)
        };
        if let Some(error) = error {
            let mut registry = self.0.borrow_mut();
            if registry.error.is_none() {
                registry.error = Some(error);
            }
        }
        for kind in kinds {
            self.register(kind);
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        match &self.0.borrow().error {
            Some(error) => Err(error.clone().into()),
            None => Ok(()),
        }
    }
}
