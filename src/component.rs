//! Component identity and capability types.
//!
//! A component is an opaque unit of design. The host never looks inside one; it
//! only needs to know its runtime type name, whether it came from a base class
//! ([`InheritanceLevel`]), whether it extends other components
//! ([`ExtenderProvider`]), and how to dispose it.

use std::any::Any ;
use std::hash::{ Hash, Hasher };
use std::rc::Rc ;

use crate::DesignerError ;



/// A unit of design that can be sited in a [`Container`]( crate::Container ).
///
/// Components are compared by reference identity through [`ComponentHandle`];
/// two structurally equal components are still two different components.
pub trait Component: Any {

	/// Fully qualified name of the component's runtime type (e.g. `"MyApp.Button"`).
	fn component_type( &self ) -> &str ;

	/// Releases the component. Called after it has left its container.
	///
	/// # Errors
	/// Implementations may fail; during an unload such failures are collected
	/// rather than aborting the teardown.
	fn dispose( &self ) -> Result<(), DesignerError> { Ok(()) }

	/// Whether the component was declared by a base class of the designed class.
	fn inheritance_level( &self ) -> InheritanceLevel { InheritanceLevel::NotInherited }

	/// Capability query for components that extend other components.
	fn as_extender_provider( &self ) -> Option<&dyn ExtenderProvider> { None }

}

/// Where a component was declared relative to the class being designed.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum InheritanceLevel {
	/// Declared by the designed class itself.
	#[default] NotInherited,
	/// Declared by a base class and may be modified.
	Inherited,
	/// Declared by a base class and may not be modified.
	InheritedReadOnly,
}

/// Capability of injecting additional properties onto other sited components.
pub trait ExtenderProvider {
	/// Whether this provider offers properties for `target`.
	fn can_extend( &self, target: &ComponentHandle ) -> bool ;
}

/// Shared handle to a component, compared and hashed by identity.
///
/// Cloning the handle creates another reference to the same component.
#[derive( Clone )]
pub struct ComponentHandle( Rc<dyn Component> );

impl ComponentHandle {

	/// Wraps a component in a new handle.
	pub fn new( component: impl Component ) -> Self { Self( Rc::new( component )) }

	/// Wraps an already shared component.
	pub fn from_rc( component: Rc<dyn Component> ) -> Self { Self( component ) }

	/// The underlying component.
	#[inline] pub fn component( &self ) -> &dyn Component { self.0.as_ref() }

	/// Shorthand for [`Component::component_type`].
	#[inline] pub fn component_type( &self ) -> &str { self.0.component_type() }

	/// Downcasts to the concrete component type.
	pub fn downcast_ref<T: Component>( &self ) -> Option<&T> {
		( self.0.as_ref() as &dyn Any ).downcast_ref::<T>()
	}

	/// Whether both handles refer to the same component.
	#[inline] pub fn ptr_eq( &self, other: &Self ) -> bool { self.address() == other.address() }

	fn address( &self ) -> *const () { Rc::as_ptr( &self.0 ).cast::<()>() }

}

impl PartialEq for ComponentHandle {
	fn eq( &self, other: &Self ) -> bool { self.ptr_eq( other ) }
}
impl Eq for ComponentHandle {}

impl Hash for ComponentHandle {
	fn hash<H: Hasher>( &self, state: &mut H ) { self.address().hash( state ) }
}

impl std::fmt::Debug for ComponentHandle {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_tuple( "ComponentHandle" )
			.field( &self.component_type() )
			.field( &self.address() )
			.finish()
	}
}

/// The type of component to instantiate through
/// [`DesignerHost::create_component`]( crate::DesignerHost::create_component ).
///
/// The surface decides how a type name maps to a constructor.
#[derive( Clone, Eq, PartialEq, Hash, Debug )]
pub struct ComponentType( String );

impl ComponentType {

	/// Creates a component type from its fully qualified name.
	pub fn new( name: impl Into<String> ) -> Self { Self( name.into() ) }

	/// Fully qualified type name.
	#[inline] pub fn name( &self ) -> &str { &self.0 }

	/// Type name without its namespace.
	pub fn short_name( &self ) -> &str {
		match self.0.rfind( '.' ) {
			Some( index ) => &self.0[index + 1..],
			None => &self.0,
		}
	}

}

impl std::fmt::Display for ComponentType {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( &self.0 ) }
}

impl From<&str> for ComponentType {
	fn from( name: &str ) -> Self { Self::new( name ) }
}
