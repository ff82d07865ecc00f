use crate :: builtin :: * ; use crate :: meta :: { Signature , ToGodot } ; use crate :: obj :: { Gd , Inherits , ObjectArg } ; use crate :: sys ; # [doc = "Engine class `Node2D`."] # [derive (Debug)] # [repr (C)] pub struct Node2D { object_ptr : sys :: GDExtensionObjectPtr , } impl Node2D { # [doc = "Calls `Node2D::set_position`."] pub fn set_position (& mut self , position : Vector2) { unsafe { Signature :: < (Vector2 ,) , () > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node2D__set_position , self . object_ptr , (position ,) ,) } } # [doc = "Calls `Node2D::get_position`."] pub fn get_position (& self ,) -> Vector2 { unsafe { Signature :: < () , Vector2 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node2D__get_position , self . object_ptr , () ,) } } # [doc = "Calls `Node2D::rotate`."] pub fn rotate (& mut self , radians : f32) { unsafe { Signature :: < (f32 ,) , () > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node2D__rotate , self . object_ptr , (radians ,) ,) } } # [doc = "Calls `Node2D::get_rotation`."] pub fn get_rotation (& self ,) -> f32 { unsafe { Signature :: < () , f32 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node2D__get_rotation , self . object_ptr , () ,) } } # [doc = "View of this object as its base class `Node`."] pub fn as_node (& self) -> & crate :: classes :: Node { unsafe { & * (self as * const Self as * const crate :: classes :: Node) } } # [doc = "View of this object as its base class `Node`."] pub fn as_node_mut (& mut self) -> & mut crate :: classes :: Node { unsafe { & mut * (self as * mut Self as * mut crate :: classes :: Node) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object (& self) -> & crate :: classes :: Object { unsafe { & * (self as * const Self as * const crate :: classes :: Object) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object_mut (& mut self) -> & mut crate :: classes :: Object { unsafe { & mut * (self as * mut Self as * mut crate :: classes :: Object) } } } impl crate :: obj :: GodotClass for Node2D { type Base = crate :: classes :: Node ; const CLASS_NAME : & 'static str = "Node2D" ; fn class_name_c () -> & 'static std :: ffi :: CStr { c"Node2D" } } unsafe impl crate :: obj :: Bounds for Node2D { type Memory = crate :: obj :: bounds :: MemManual ; type DynMemory = crate :: obj :: bounds :: MemManual ; type Declarer = crate :: obj :: bounds :: DeclEngine ; } unsafe impl crate :: obj :: Inherits < crate :: classes :: Node > for Node2D { } unsafe impl crate :: obj :: Inherits < crate :: classes :: Object > for Node2D { } impl std :: ops :: Deref for Node2D { type Target = crate :: classes :: Node ; fn deref (& self) -> & Self :: Target { unsafe { & * (self as * const Self as * const Self :: Target) } } } impl std :: ops :: DerefMut for Node2D { fn deref_mut (& mut self) -> & mut Self :: Target { unsafe { & mut * (self as * mut Self as * mut Self :: Target) } } } impl crate :: obj :: cap :: GodotDefault for Node2D { } # [doc (hidden)] # [macro_export] macro_rules ! inherit_from_Node2D__gdbind { ($ Class : ty) => { unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Node2D > for $ Class { } unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Node > for $ Class { } unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Object > for $ Class { } } ; } # [doc = "Virtual methods of `Node2D` and its base classes, to override in a host class with `#[godot_api]`."] # [allow (unused_variables)] pub trait INode2D : crate :: obj :: GodotClass + crate :: private :: You_forgot_the_attribute__godot_api { # [doc = r" Default constructor of the host class, receiving the handle to its engine base."] fn init (base : crate :: obj :: Base < Self :: Base >) -> Self where Self : Sized , { unimplemented ! () } # [doc = "Override of the engine's `_process`."] fn process (& mut self , delta : f64) { unimplemented ! () } # [doc = "Override of the engine's `_ready`."] fn ready (& mut self ,) { unimplemented ! () } }