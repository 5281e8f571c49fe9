//! A transactional design-time component host.
//!
//! A visual designer edits a class by hosting live instances of the components
//! that make it up. `design_host` provides the container that mediates those
//! instances: it sites components, binds each one to a designer, batches edits
//! into transactions and drives the load lifecycle of the design.
//!
//! # Core Concepts
//!
//! - [`DesignerHost`]: The root container. Owns the component → designer map,
//! 	the transaction stack and the load state. The first component added to an
//! 	empty host becomes the **root component**, which represents the class
//! 	being designed and requires a [`RootDesigner`].
//!
//! - [`Component`]: An opaque unit of design, shared through a [`ComponentHandle`]
//! 	and compared by identity.
//!
//! - [`Designer`]: Design-time behaviour bound one-to-one to a component.
//!
//! - [`Site`]: The record binding a component to its [`Container`], its name,
//! 	a per-component dictionary and any nested containers it owns.
//!
//! - [`Container`]: Either the host's own container or one nested under an
//! 	owning component. Both route additions and removals through the same
//! 	protocol.
//!
//! - [`DesignerTransaction`]: A unit of work. Transactions nest but must close in
//! 	LIFO order.
//!
//! - [`Surface`] and [`DesignerLoader`]: The collaborators that own the host and
//! 	populate it.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell ;
//! use std::rc::Rc ;
//! use design_host::*;
//!
//! struct Form ;
//! impl Component for Form {
//! 	fn component_type( &self ) -> &str { "MyApp.Form" }
//! }
//!
//! #[derive( Default )]
//! struct FormDesigner { component: RefCell<Option<ComponentHandle>> }
//! impl Designer for FormDesigner {
//! 	fn initialize( &self, _host: &DesignerHost, component: &ComponentHandle ) -> Result<(), DesignerError> {
//! 		*self.component.borrow_mut() = Some( component.clone() );
//! 		Ok(())
//! 	}
//! 	fn component( &self ) -> Option<ComponentHandle> { self.component.borrow().clone() }
//! 	fn as_root_designer( &self ) -> Option<&dyn RootDesigner> { Some( self ) }
//! }
//! impl RootDesigner for FormDesigner {}
//!
//! // The surface decides which designer each component gets and how component
//! // types are instantiated.
//! struct FormSurface ;
//! impl ServiceProvider for FormSurface {
//! 	fn service_entry( &self, _: std::any::TypeId ) -> Option<Rc<dyn std::any::Any>> { None }
//! }
//! impl Surface for FormSurface {
//! 	fn create_designer( &self, _: &DesignerHost, _: &ComponentHandle, root: bool ) -> Result<Option<DesignerHandle>, DesignerError> {
//! 		Ok( root.then(|| DesignerHandle::new( FormDesigner::default() )))
//! 	}
//! 	fn create_instance( &self, _: &DesignerHost, component_type: &ComponentType, _: &LicenseContext ) -> Result<Option<ComponentHandle>, DesignerError> {
//! 		Ok(( component_type.name() == "MyApp.Form" ).then(|| ComponentHandle::new( Form )))
//! 	}
//! }
//!
//! // A loader would normally deserialize a design; this one builds it by hand.
//! struct FormLoader ;
//! impl DesignerLoader for FormLoader {
//! 	fn begin_load( &self, host: &DesignerHost ) -> Result<(), DesignerError> {
//! 		host.create_component( &ComponentType::new( "MyApp.Form" ), Some( "Form1" ))?;
//! 		host.end_load( Some( "MyApp.Form1" ), true, Vec::new() )
//! 	}
//! }
//!
//! # fn main() -> Result<(), DesignerError> {
//! let host = DesignerHost::new( Rc::new( FormSurface ));
//! host.begin_load( Rc::new( FormLoader ))?;
//!
//! let form = host.root_component().expect( "the loader creates a root component" );
//! let site = host.site( &form ).expect( "the root component is sited" );
//! assert_eq!( site.name(), "Form1" );
//!
//! // Renaming the root keeps the namespace of the designed class.
//! site.set_name( Some( "MainForm" ))?;
//! assert_eq!( host.root_component_class_name().as_deref(), Some( "MyApp.MainForm" ));
//!
//! host.unload()?;
//! assert!( host.components().is_empty() );
//! # Ok(())
//! # }
//! ```
//!
//! # Re-entrancy
//!
//! The host is single-threaded but fully re-entrant. Event handlers, designers
//! being initialised and component constructors may all call back into the
//! host, for instance a constructor run by [`DesignerHost::create_component`]
//! may add the new component to the host itself. The host never holds a borrow
//! of its own state across such a callback.

mod error ;
mod component ;
mod designer ;
mod services ;
pub mod events ;
mod site ;
mod container ;
mod transaction ;
mod license ;
mod surface ;
mod host ;

#[doc( no_inline )]
pub use nonempty_collections::NEVec ;

pub use error::{ DesignerError, UnloadErrors };
pub use component::{ Component, ComponentHandle, ComponentType, ExtenderProvider, InheritanceLevel };
pub use designer::{ Designer, DesignerHandle, RootDesigner };
pub use services::{
	ServiceProvider, ServiceProviderExt, ServiceContainer, ExtenderSource, ExtenderProviderService,
	NameCreationService, DefaultNameCreationService, SelectionService, HelpKeywordType, HelpService,
	DesignerEventService,
};
pub use events::{ EventList, HandlerId, HostEvents };
pub use site::Site ;
pub use container::Container ;
pub use transaction::{ DesignerTransaction, TransactionStatus };
pub use license::{ LicenseContext, LicenseUsageMode };
pub use surface::{ Surface, DesignerLoader };
pub use host::{ DesignerHost, HostBuilder };
