//! Designers: the design-time behaviour bound to a component.

use std::any::Any ;
use std::rc::Rc ;

use crate::{ ComponentHandle, DesignerError, DesignerHost, ExtenderProvider };



/// Design-time behaviour bound one-to-one to a sited component.
///
/// Designers are created by the [`Surface`]( crate::Surface ) right after their
/// component joins a container. The host registers the designer before calling
/// [`initialize`]( Self::initialize ), so the designer can already be found via
/// [`DesignerHost::designer`] while it initialises.
pub trait Designer: Any {

	/// Binds the designer to its component.
	///
	/// # Errors
	/// A failure removes the designer again and rolls the component back out of
	/// its container.
	fn initialize( &self, host: &DesignerHost, component: &ComponentHandle ) -> Result<(), DesignerError> ;

	/// The component this designer is bound to, once initialised.
	fn component( &self ) -> Option<ComponentHandle> ;

	/// Releases the designer before its component is removed.
	///
	/// # Errors
	/// During an unload failures are collected rather than aborting the teardown.
	fn dispose( &self ) -> Result<(), DesignerError> { Ok(()) }

	/// Type name used to build help keywords.
	fn designer_type( &self ) -> &str { std::any::type_name::<Self>() }

	/// Capability query for designers able to design a root component.
	fn as_root_designer( &self ) -> Option<&dyn RootDesigner> { None }

	/// Capability query for designers that extend other components.
	fn as_extender_provider( &self ) -> Option<&dyn ExtenderProvider> { None }

}

/// Capability of designing the root component of a load.
pub trait RootDesigner {
	/// Help keyword published for this designer; `Designer_<type>` when `None`.
	fn help_keyword( &self ) -> Option<String> { None }
}

/// Shared handle to a designer, compared by identity.
#[derive( Clone )]
pub struct DesignerHandle( Rc<dyn Designer> );

impl DesignerHandle {

	pub fn new( designer: impl Designer ) -> Self { Self( Rc::new( designer )) }

	pub fn from_rc( designer: Rc<dyn Designer> ) -> Self { Self( designer ) }

	#[inline] pub fn designer( &self ) -> &dyn Designer { self.0.as_ref() }

	/// Downcasts to the concrete designer type.
	pub fn downcast_ref<T: Designer>( &self ) -> Option<&T> {
		( self.0.as_ref() as &dyn Any ).downcast_ref::<T>()
	}

	#[inline] pub fn ptr_eq( &self, other: &Self ) -> bool {
		Rc::as_ptr( &self.0 ).cast::<()>() == Rc::as_ptr( &other.0 ).cast::<()>()
	}

	pub(crate) fn help_keyword( &self ) -> String {
		self.0.as_root_designer()
			.and_then( RootDesigner::help_keyword )
			.unwrap_or_else(|| format!( "Designer_{}", self.0.designer_type() ))
	}

}

impl PartialEq for DesignerHandle {
	fn eq( &self, other: &Self ) -> bool { self.ptr_eq( other ) }
}
impl Eq for DesignerHandle {}

impl std::fmt::Debug for DesignerHandle {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_tuple( "DesignerHandle" ).field( &self.0.designer_type() ).finish()
	}
}
