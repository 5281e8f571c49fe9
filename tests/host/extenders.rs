use std::rc::Rc ;
use design_host::{ ExtenderProviderService, ExtenderSource, InheritanceLevel };
use crate::fixtures::{ self, DesignerSpec, RecordingExtenders, TestComponent };

fn setup_with_extenders() -> ( design_host::DesignerHost, Rc<fixtures::TestSurface>, Rc<RecordingExtenders> ) {
	let ( host, surface ) = fixtures::setup();
	let extenders = Rc::new( RecordingExtenders::default() );
	surface.services.add_service::<dyn ExtenderProviderService>( Rc::clone( &extenders ) as Rc<dyn ExtenderProviderService> );
	( host, surface, extenders )
}

#[test]
fn extender_component_is_registered_and_unregistered() {

	let ( host, _surface, extenders ) = setup_with_extenders();
	fixtures::add_root( &host );
	let tooltip = TestComponent::new( "MyApp.ToolTip" ).extender().handle();

	host.add( tooltip.clone(), Some( "toolTip1" )).expect( "Failed to add extender" );
	assert!( extenders.has_component( &tooltip ));

	host.remove( &tooltip ).expect( "Failed to remove extender" );
	assert!( !extenders.has_component( &tooltip ));

}

#[test]
fn read_only_inherited_extender_is_not_registered() {

	let ( host, _surface, extenders ) = setup_with_extenders();
	fixtures::add_root( &host );
	let tooltip = TestComponent::new( "MyApp.ToolTip" )
		.extender()
		.inherited( InheritanceLevel::InheritedReadOnly )
		.handle();

	host.add( tooltip.clone(), Some( "toolTip1" )).expect( "Failed to add extender" );

	assert!( !extenders.has_component( &tooltip ));

}

#[test]
fn extender_designer_is_registered_and_unregistered() {

	let ( host, surface, extenders ) = setup_with_extenders();
	fixtures::add_root( &host );
	surface.designer_for( "MyApp.Panel", DesignerSpec { extender: true, ..DesignerSpec::default() });

	let panel = fixtures::add_child( &host, "MyApp.Panel", "panel1" );
	let designer = fixtures::designer_of( &host, &panel );
	assert_eq!( extenders.designers(), 1 );
	assert!( extenders.providers.borrow().contains( &ExtenderSource::Designer( designer )));
	assert!( extenders.providers.borrow().iter().all(| source | source.can_extend( &panel )));

	host.remove( &panel ).expect( "Failed to remove panel" );
	assert_eq!( extenders.designers(), 0 );

}

#[test]
fn extender_is_unregistered_on_rollback() {

	let ( host, surface, extenders ) = setup_with_extenders();
	fixtures::add_root( &host );
	surface.designer_for( "MyApp.ToolTip", DesignerSpec { fail_init: true, ..DesignerSpec::default() });
	let tooltip = TestComponent::new( "MyApp.ToolTip" ).extender().handle();

	assert!( host.add( tooltip.clone(), Some( "toolTip1" )).is_err() );

	assert!( !extenders.has_component( &tooltip ));
	assert!( extenders.providers.borrow().is_empty() );

}
