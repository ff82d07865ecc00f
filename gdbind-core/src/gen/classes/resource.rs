use crate :: builtin :: * ; use crate :: meta :: { Signature , ToGodot } ; use crate :: obj :: { Gd , Inherits , ObjectArg } ; use crate :: sys ; # [doc = "Engine class `Resource`."] # [derive (Debug)] # [repr (C)] pub struct Resource { object_ptr : sys :: GDExtensionObjectPtr , } impl Resource { # [doc = "Calls `Resource::set_name`."] pub fn set_name (& mut self , name : impl Into < GString >) { unsafe { Signature :: < (GString ,) , () > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Resource__set_name , self . object_ptr , (name . into () ,) ,) } } # [doc = "Calls `Resource::get_name`."] pub fn get_name (& self ,) -> GString { unsafe { Signature :: < () , GString > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Resource__get_name , self . object_ptr , () ,) } } # [doc = "View of this object as its base class `RefCounted`."] pub fn as_ref_counted (& self) -> & crate :: classes :: RefCounted { unsafe { & * (self as * const Self as * const crate :: classes :: RefCounted) } } # [doc = "View of this object as its base class `RefCounted`."] pub fn as_ref_counted_mut (& mut self) -> & mut crate :: classes :: RefCounted { unsafe { & mut * (self as * mut Self as * mut crate :: classes :: RefCounted) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object (& self) -> & crate :: classes :: Object { unsafe { & * (self as * const Self as * const crate :: classes :: Object) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object_mut (& mut self) -> & mut crate :: classes :: Object { unsafe { & mut * (self as * mut Self as * mut crate :: classes :: Object) } } } impl crate :: obj :: GodotClass for Resource { type Base = crate :: classes :: RefCounted ; const CLASS_NAME : & 'static str = "Resource" ; fn class_name_c () -> & 'static std :: ffi :: CStr { c"Resource" } } unsafe impl crate :: obj :: Bounds for Resource { type Memory = crate :: obj :: bounds :: MemRefCounted ; type DynMemory = crate :: obj :: bounds :: MemRefCounted ; type Declarer = crate :: obj :: bounds :: DeclEngine ; } unsafe impl crate :: obj :: Inherits < crate :: classes :: RefCounted > for Resource { } unsafe impl crate :: obj :: Inherits < crate :: classes :: Object > for Resource { } impl std :: ops :: Deref for Resource { type Target = crate :: classes :: RefCounted ; fn deref (& self) -> & Self :: Target { unsafe { & * (self as * const Self as * const Self :: Target) } } } impl std :: ops :: DerefMut for Resource { fn deref_mut (& mut self) -> & mut Self :: Target { unsafe { & mut * (self as * mut Self as * mut Self :: Target) } } } impl crate :: obj :: cap :: GodotDefault for Resource { } # [doc (hidden)] # [macro_export] macro_rules ! inherit_from_Resource__gdbind { ($ Class : ty) => { unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Resource > for $ Class { } unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: RefCounted > for $ Class { } unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Object > for $ Class { } } ; } # [doc = "Virtual methods of `Resource` and its base classes, to override in a host class with `#[godot_api]`."] # [allow (unused_variables)] pub trait IResource : crate :: obj :: GodotClass + crate :: private :: You_forgot_the_attribute__godot_api { # [doc = r" Default constructor of the host class, receiving the handle to its engine base."] fn init (base : crate :: obj :: Base < Self :: Base >) -> Self where Self : Sized , { unimplemented ! () } # [doc = "Override of the engine's `_setup_local_to_scene`."] fn setup_local_to_scene (& mut self ,) { unimplemented ! () } }