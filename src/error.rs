use std::rc::Rc ;
use nonempty_collections::NEVec ;
use thiserror::Error ;



/// Errors raised by the [`DesignerHost`]( crate::DesignerHost ) and the
/// collaborators it drives.
///
/// The type is cheap to clone: the same error may be handed to the surface's
/// `on_loaded` notification and returned to the caller.
#[derive( Error, Debug, Clone )]
pub enum DesignerError {
	/// A component was added while the host was tearing its components down.
	#[error( "Cannot add components while the designer host is unloading" )] UnloadingInProgress,
	/// An instance of the designed class was added to its own design surface.
	#[error( "Cannot add an instance of {component_type} to the designer of {root_class_name}" )]
	CyclicAdd { component_type: String, root_class_name: String },
	/// The first component added during a load had no root designer.
	#[error( "No root designer is available for the root component of type {component_type}" )]
	NoTopLevelDesigner { component_type: String },
	/// A designer finished initialising without binding to its component.
	#[error( "The designer must be bound to a component once initialised" )] DesignerNeedsComponent,
	/// Another component in the container already uses this name.
	#[error( "Duplicate component name: {0}" )] DuplicateName( String ),
	/// The name creation service rejected a name.
	#[error( "Invalid component name {name:?}: {reason}" )]
	InvalidName { name: String, reason: String },
	/// A transaction was closed while a transaction opened after it was still open.
	#[error( "Cannot close transaction {closing:?} while nested transaction {innermost:?} is open" )]
	NestedTransaction { closing: String, innermost: String },
	/// A load reported success but no root component was created.
	#[error( "The load completed without creating a root component" )] NoBaseClass,
	/// One or more components or designers failed while being torn down.
	#[error( "{0}" )] Unload( UnloadErrors ),
	/// `begin_load` was called with a loader other than the one already bound.
	#[error( "A different designer loader is already bound to this host" )] LoaderAlreadySpecified,
	/// The surface produced nothing usable for the requested type.
	#[error( "Failed to create a component of type {component_type}" )]
	ComponentCreationFailed { component_type: String },
	/// Read-only inherited components belong to the base class and cannot be destroyed.
	#[error( "Cannot destroy inherited component {name}" )] CantDestroyInherited { name: String },
	/// A checkout or a handler canceled the operation.
	#[error( "The operation was canceled" )] Canceled,
	/// The loader failed without a usable message.
	#[error( "The designer loader failed: {0}" )] LoaderFailure( String ),
	/// The host has been disposed and is detached from its surface.
	#[error( "The designer host has been disposed" )] Disposed,
	/// An error raised by a component, designer, loader or handler.
	#[error( "{0}" )] External( Rc<dyn std::error::Error> ),
}

impl DesignerError {

	/// Wraps an arbitrary error raised by a collaborator.
	pub fn external( error: impl std::error::Error + 'static ) -> Self {
		Self::External( Rc::new( error ))
	}

	/// Whether this is the cancellation sentinel.
	#[inline] pub fn is_canceled( &self ) -> bool { matches!( self, Self::Canceled ) }

}

/// Every error raised while unloading, in teardown order.
///
/// An unload that reports this error still completed: all components and
/// designers were released, some of them just failed while doing so.
#[derive( Debug, Clone )]
pub struct UnloadErrors( NEVec<DesignerError> );

impl UnloadErrors {

	pub(crate) fn from_vec( errors: Vec<DesignerError> ) -> Option<Self> {
		NEVec::try_from_vec( errors ).map( Self )
	}

	/// The individual failures.
	#[inline] pub fn errors( &self ) -> &NEVec<DesignerError> { &self.0 }

	/// Number of failures; never zero.
	#[allow( clippy::len_without_is_empty )]
	#[inline] pub fn len( &self ) -> usize { self.0.len().get() }

	pub fn iter( &self ) -> impl Iterator<Item = &DesignerError> { self.0.iter().into_iter() }

}

impl std::fmt::Display for UnloadErrors {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!( f, "{} error(s) occurred while unloading: ", self.len() )?;
		self.iter().enumerate().try_for_each(|( index, error )| match index {
			0 => write!( f, "{}", error ),
			_ => write!( f, "; {}", error ),
		})
	}
}

impl std::error::Error for UnloadErrors {}
